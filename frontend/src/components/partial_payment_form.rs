use shared::PayableAccount;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::hooks::use_payables::Done;
use crate::services::format::format_currency;

#[derive(Properties, PartialEq)]
pub struct PartialPaymentFormProps {
    pub account: PayableAccount,
    pub on_submit: Callback<(PayableAccount, String, Done)>,
    pub on_close: Callback<()>,
}

/// Abono dialog; stays open with the error on failure so the user can retry
#[function_component(PartialPaymentForm)]
pub fn partial_payment_form(props: &PartialPaymentFormProps) -> Html {
    let amount = use_state(String::new);
    let error = use_state(|| None::<String>);
    let submitting = use_state(|| false);

    let on_input = {
        let amount = amount.clone();
        Callback::from(move |e: InputEvent| {
            amount.set(e.target_unchecked_into::<HtmlInputElement>().value());
        })
    };

    let on_submit = {
        let amount = amount.clone();
        let error = error.clone();
        let submitting = submitting.clone();
        let account = props.account.clone();
        let on_submit = props.on_submit.clone();
        let on_close = props.on_close.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            submitting.set(true);
            let error = error.clone();
            let submitting = submitting.clone();
            let on_close = on_close.clone();
            let done = Callback::from(move |result: Result<(), String>| {
                submitting.set(false);
                match result {
                    Ok(()) => on_close.emit(()),
                    Err(e) => error.set(Some(e)),
                }
            });
            on_submit.emit((account.clone(), (*amount).clone(), done));
        })
    };

    let on_cancel = {
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| on_close.emit(()))
    };

    let account = &props.account;
    html! {
        <div class="modal-backdrop">
            <div class="modal">
                <h2>{format!("Abono a \"{}\"", account.concept)}</h2>
                <p class="hint">
                    {format!("Total {} · abonado {} · saldo {}",
                        format_currency(account.amount_with_tax),
                        format_currency(account.paid_so_far()),
                        format_currency(account.outstanding()))}
                </p>
                {if let Some(message) = (*error).as_ref() {
                    html! { <div class="form-message error">{message}</div> }
                } else { html! {} }}
                <form onsubmit={on_submit}>
                    <div class="form-group">
                        <label for="monto_abono">{"Monto del abono"}</label>
                        <input id="monto_abono" type="text" inputmode="decimal" placeholder="0.00"
                            value={(*amount).clone()} oninput={on_input} disabled={*submitting} />
                    </div>
                    <div class="form-actions">
                        <button type="button" onclick={on_cancel} disabled={*submitting}>{"Cancelar"}</button>
                        <button type="submit" class="primary" disabled={*submitting}>{"Registrar abono"}</button>
                    </div>
                </form>
            </div>
        </div>
    }
}
