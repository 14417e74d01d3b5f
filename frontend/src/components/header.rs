use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct HeaderProps {
    pub user: Option<String>,
    pub on_logout: Callback<()>,
}

#[function_component(Header)]
pub fn header(props: &HeaderProps) -> Html {
    let on_logout = {
        let on_logout = props.on_logout.clone();
        Callback::from(move |_: MouseEvent| on_logout.emit(()))
    };

    html! {
        <header class="header">
            <div class="container">
                <h1>{"Cuentas por Pagar"}</h1>
                {if let Some(user) = &props.user {
                    html! {
                        <div class="header-right">
                            <span class="user-name">{user}</span>
                            <button class="logout" onclick={on_logout}>{"Salir"}</button>
                        </div>
                    }
                } else { html! {} }}
            </div>
        </header>
    }
}
