use web_sys::HtmlInputElement;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct LoginPromptProps {
    pub is_loading: bool,
    pub error: Option<String>,
    pub on_login: Callback<String>,
}

#[function_component(LoginPrompt)]
pub fn login_prompt(props: &LoginPromptProps) -> Html {
    let user = use_state(String::new);

    let on_input = {
        let user = user.clone();
        Callback::from(move |e: InputEvent| user.set(e.target_unchecked_into::<HtmlInputElement>().value()))
    };

    let on_submit = {
        let user = user.clone();
        let on_login = props.on_login.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            on_login.emit((*user).clone());
        })
    };

    html! {
        <section class="login">
            <h2>{"Identifícate"}</h2>
            {if let Some(error) = &props.error {
                html! { <div class="form-message error">{error}</div> }
            } else { html! {} }}
            <form onsubmit={on_submit}>
                <input type="text" placeholder="Usuario" value={(*user).clone()} oninput={on_input}
                    disabled={props.is_loading} />
                <button type="submit" class="primary" disabled={props.is_loading}>
                    {if props.is_loading { "Cargando..." } else { "Entrar" }}
                </button>
            </form>
        </section>
    }
}
