use shared::Resource;
use yew::prelude::*;

mod components;
mod hooks;
mod services;

use components::{Header, LoginPrompt, PayablesPage};
use hooks::use_app_context::{use_app_context, AppContext};
use services::api::ApiClient;

#[function_component(App)]
fn app() -> Html {
    let api_client = use_memo((), |_| ApiClient::new());
    let session = use_app_context(&api_client);

    let body = match &session.context.user {
        None => html! {
            <LoginPrompt
                is_loading={session.is_loading}
                error={session.error.clone()}
                on_login={session.actions.login.clone()}
            />
        },
        Some(_) if !session.context.can_access(Resource::CuentasPagar) => html! {
            <div class="container access-denied">
                {"No tienes permiso para ver las cuentas por pagar."}
            </div>
        },
        Some(_) => html! {
            <PayablesPage api_client={(*api_client).clone()} />
        },
    };

    html! {
        <ContextProvider<AppContext> context={session.context.clone()}>
            <div class="app">
                <Header user={session.context.user.clone()} on_logout={session.actions.logout.clone()} />
                {body}
            </div>
        </ContextProvider<AppContext>>
    }
}

fn main() {
    yew::Renderer::<App>::new().render();
}
