use shared::payment::{apply_partial_payment, parse_payment_amount};
use shared::{PayableAccount, PayableInput};
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::services::api::ApiClient;
use crate::services::logging::Logger;

/// Completion signal handed back to forms; `Err` carries the message to show
pub type Done = Callback<Result<(), String>>;

#[derive(Debug, Clone, PartialEq)]
pub struct PayablesState {
    pub items: Vec<PayableAccount>,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl Default for PayablesState {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            is_loading: true,
            error: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PayablesAction {
    FetchStarted,
    Fetched(Vec<PayableAccount>),
    FetchFailed(String),
    MutationStarted,
    MutationFailed(String),
    ErrorCleared,
}

/// The banner error is only replaced by a newer failure, cleared by the user
/// or by the next mutation; a successful refetch leaves it alone
impl Reducible for PayablesState {
    type Action = PayablesAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        match action {
            PayablesAction::FetchStarted => next.is_loading = true,
            PayablesAction::Fetched(items) => {
                next.items = items;
                next.is_loading = false;
            }
            PayablesAction::FetchFailed(e) => {
                next.error = Some(e);
                next.is_loading = false;
            }
            PayablesAction::MutationStarted | PayablesAction::ErrorCleared => next.error = None,
            PayablesAction::MutationFailed(e) => next.error = Some(e),
        }
        Rc::new(next)
    }
}

pub struct UsePayablesResult {
    pub state: PayablesState,
    pub actions: UsePayablesActions,
}

#[derive(Clone, PartialEq)]
pub struct UsePayablesActions {
    pub refetch: Callback<()>,
    pub create: Callback<(PayableInput, Done)>,
    pub update: Callback<(String, PayableInput, Done)>,
    pub remove: Callback<(String, Done)>,
    pub toggle_paid: Callback<String>,
    /// Record plus the raw amount typed by the user
    pub apply_partial_payment: Callback<(PayableAccount, String, Done)>,
    pub clear_error: Callback<()>,
}

/// Full payable collection with mutations; every mutation ends in a refetch
#[hook]
pub fn use_payables(api_client: &ApiClient) -> UsePayablesResult {
    let state = use_reducer(PayablesState::default);

    let refetch = {
        let api_client = api_client.clone();
        let dispatcher = state.dispatcher();

        use_callback(api_client.clone(), move |_: (), _| {
            let api_client = api_client.clone();
            let dispatcher = dispatcher.clone();

            spawn_local(async move {
                dispatcher.dispatch(PayablesAction::FetchStarted);
                match api_client.list_payables().await {
                    Ok(data) => dispatcher.dispatch(PayablesAction::Fetched(data)),
                    Err(e) => {
                        Logger::error_with_component("use_payables", &format!("Failed to fetch payables: {}", e));
                        dispatcher.dispatch(PayablesAction::FetchFailed(e));
                    }
                }
            });
        })
    };

    {
        let refetch = refetch.clone();
        use_effect_with((), move |_| {
            refetch.emit(());
            || ()
        });
    }

    let create = {
        let api_client = api_client.clone();
        let dispatcher = state.dispatcher();
        let refetch = refetch.clone();

        use_callback(api_client.clone(), move |(input, done): (PayableInput, Done), _| {
            let api_client = api_client.clone();
            let dispatcher = dispatcher.clone();
            let refetch = refetch.clone();

            dispatcher.dispatch(PayablesAction::MutationStarted);
            spawn_local(async move {
                let result = api_client.create_payable(&input).await.map(|created| {
                    Logger::info_with_component("use_payables", &format!("Created payable {}", created.id));
                });
                finish(result, &dispatcher, &done, "create");
                refetch.emit(());
            });
        })
    };

    let update = {
        let api_client = api_client.clone();
        let dispatcher = state.dispatcher();
        let refetch = refetch.clone();

        use_callback(api_client.clone(), move |(id, input, done): (String, PayableInput, Done), _| {
            let api_client = api_client.clone();
            let dispatcher = dispatcher.clone();
            let refetch = refetch.clone();

            dispatcher.dispatch(PayablesAction::MutationStarted);
            spawn_local(async move {
                let result = api_client.update_payable(&id, &input).await.map(|_| ());
                finish(result, &dispatcher, &done, "update");
                refetch.emit(());
            });
        })
    };

    let remove = {
        let api_client = api_client.clone();
        let dispatcher = state.dispatcher();
        let refetch = refetch.clone();

        use_callback(api_client.clone(), move |(id, done): (String, Done), _| {
            let api_client = api_client.clone();
            let dispatcher = dispatcher.clone();
            let refetch = refetch.clone();

            dispatcher.dispatch(PayablesAction::MutationStarted);
            spawn_local(async move {
                let result = api_client.delete_payable(&id).await.map(|response| {
                    Logger::info_with_component("use_payables", &response.success_message);
                });
                finish(result, &dispatcher, &done, "delete");
                refetch.emit(());
            });
        })
    };

    let toggle_paid = {
        let api_client = api_client.clone();
        let dispatcher = state.dispatcher();
        let refetch = refetch.clone();

        use_callback(api_client.clone(), move |id: String, _| {
            let api_client = api_client.clone();
            let dispatcher = dispatcher.clone();
            let refetch = refetch.clone();

            dispatcher.dispatch(PayablesAction::MutationStarted);
            spawn_local(async move {
                let result = api_client.toggle_paid(&id).await.map(|_| ());
                finish(result, &dispatcher, &Callback::noop(), "toggle paid");
                refetch.emit(());
            });
        })
    };

    let apply_partial_payment_cb = {
        let api_client = api_client.clone();
        let dispatcher = state.dispatcher();
        let refetch = refetch.clone();

        use_callback(
            api_client.clone(),
            move |(account, raw_amount, done): (PayableAccount, String, Done), _| {
                // Validation failures never reach the network
                let outcome = match parse_payment_amount(&raw_amount)
                    .and_then(|amount| apply_partial_payment(&account, amount))
                {
                    Ok(outcome) => outcome,
                    Err(e) => {
                        done.emit(Err(e.to_string()));
                        return;
                    }
                };
                if let Some(extra) = outcome.overpaid_by {
                    Logger::warn_with_component(
                        "use_payables",
                        &format!("Payment on {} exceeds the amount due by {:.2}", account.id, extra),
                    );
                }

                let api_client = api_client.clone();
                let dispatcher = dispatcher.clone();
                let refetch = refetch.clone();
                let input = PayableInput::from(&outcome.updated);

                dispatcher.dispatch(PayablesAction::MutationStarted);
                spawn_local(async move {
                    let result = api_client.update_payable(&account.id, &input).await.map(|_| ());
                    finish(result, &dispatcher, &done, "apply partial payment");
                    refetch.emit(());
                });
            },
        )
    };

    let clear_error = {
        let dispatcher = state.dispatcher();
        use_callback((), move |_: (), _| dispatcher.dispatch(PayablesAction::ErrorCleared))
    };

    UsePayablesResult {
        state: (*state).clone(),
        actions: UsePayablesActions {
            refetch,
            create,
            update,
            remove,
            toggle_paid,
            apply_partial_payment: apply_partial_payment_cb,
            clear_error,
        },
    }
}

fn finish(
    result: Result<(), String>,
    dispatcher: &UseReducerDispatcher<PayablesState>,
    done: &Done,
    action: &str,
) {
    if let Err(e) = &result {
        Logger::error_with_component("use_payables", &format!("Failed to {}: {}", action, e));
    }
    if let Some(failed) = report(result, done) {
        dispatcher.dispatch(failed);
    }
}

/// Hand the result to the caller's form and return the banner update for a failure
fn report(result: Result<(), String>, done: &Done) -> Option<PayablesAction> {
    let failed = result.as_ref().err().map(|e| PayablesAction::MutationFailed(e.clone()));
    done.emit(result);
    failed
}
