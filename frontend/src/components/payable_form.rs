use chrono::NaiveDate;
use shared::{amount_with_tax, Category, PayableAccount, PayableInput, Provider, DEFAULT_TAX_RATE};
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

use crate::hooks::use_payables::Done;
use crate::services::format::format_currency;

/// Raw text of the form fields, as typed
#[derive(Clone, Debug, PartialEq)]
pub struct PayableFormState {
    pub concept: String,
    pub net_amount: String,
    pub requires_tax: bool,
    pub category: String,
    pub provider_id: String,
    pub due_date: String,
    pub is_paid: bool,
    pub partial_payments: String,
    pub transfer_amount: String,
    pub cash_amount: String,
}

impl PayableFormState {
    pub fn empty(today: NaiveDate) -> Self {
        Self {
            concept: String::new(),
            net_amount: String::new(),
            requires_tax: true,
            category: String::new(),
            provider_id: String::new(),
            due_date: today.format("%Y-%m-%d").to_string(),
            is_paid: false,
            partial_payments: String::new(),
            transfer_amount: String::new(),
            cash_amount: String::new(),
        }
    }

    pub fn from_account(account: &PayableAccount) -> Self {
        let amount = |value: f64| format!("{:.2}", value);
        Self {
            concept: account.concept.clone(),
            net_amount: amount(account.net_amount),
            requires_tax: account.requires_tax,
            category: account.category.clone(),
            provider_id: account.provider_id.clone().unwrap_or_default(),
            due_date: account.due_date.format("%Y-%m-%d").to_string(),
            is_paid: account.is_paid,
            partial_payments: if account.partial_payments > 0.0 {
                amount(account.partial_payments)
            } else {
                String::new()
            },
            transfer_amount: account.transfer_amount.map(amount).unwrap_or_default(),
            cash_amount: account.cash_amount.map(amount).unwrap_or_default(),
        }
    }

    /// Parse and validate; the error is ready to show next to the form
    pub fn to_input(&self) -> Result<PayableInput, String> {
        let net_amount = parse_amount(&self.net_amount, "monto neto")?
            .ok_or_else(|| "El monto neto es obligatorio".to_string())?;
        let due_date = NaiveDate::parse_from_str(self.due_date.trim(), "%Y-%m-%d")
            .map_err(|_| "La fecha de vencimiento no es válida".to_string())?;
        let provider_id = self.provider_id.trim();

        let input = PayableInput {
            concept: self.concept.trim().to_string(),
            net_amount,
            requires_tax: self.requires_tax,
            category: self.category.trim().to_string(),
            provider_id: if provider_id.is_empty() { None } else { Some(provider_id.to_string()) },
            due_date,
            is_paid: self.is_paid,
            partial_payments: parse_amount(&self.partial_payments, "pagos parciales")?.unwrap_or(0.0),
            transfer_amount: parse_amount(&self.transfer_amount, "monto transferencia")?,
            cash_amount: parse_amount(&self.cash_amount, "monto efectivo")?,
        };
        input.validate().map_err(|e| e.to_string())?;
        Ok(input)
    }

    /// Preview only; the backend derives the stored value with its configured rate
    pub fn preview_amount_with_tax(&self) -> Option<f64> {
        parse_amount(&self.net_amount, "")
            .ok()
            .flatten()
            .map(|net| amount_with_tax(net, self.requires_tax, DEFAULT_TAX_RATE))
    }
}

fn parse_amount(value: &str, field: &str) -> Result<Option<f64>, String> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    value
        .replace(',', "")
        .parse::<f64>()
        .map(Some)
        .map_err(|_| format!("El campo {} debe ser un número", field))
}

#[derive(Properties, PartialEq)]
pub struct PayableFormProps {
    /// `None` creates a new record
    pub editing: Option<PayableAccount>,
    pub providers: Vec<Provider>,
    pub categories: Vec<Category>,
    pub today: NaiveDate,
    pub on_submit: Callback<(PayableInput, Done)>,
    pub on_close: Callback<()>,
}

#[function_component(PayableForm)]
pub fn payable_form(props: &PayableFormProps) -> Html {
    let form = {
        let editing = props.editing.clone();
        let today = props.today;
        use_state(move || match &editing {
            Some(account) => PayableFormState::from_account(account),
            None => PayableFormState::empty(today),
        })
    };
    let form_error = use_state(|| None::<String>);
    let submitting = use_state(|| false);

    let text_field = |apply: fn(&mut PayableFormState, String)| {
        let form = form.clone();
        Callback::from(move |e: Event| {
            let mut next = (*form).clone();
            apply(&mut next, e.target_unchecked_into::<HtmlInputElement>().value());
            form.set(next);
        })
    };
    let select_field = |apply: fn(&mut PayableFormState, String)| {
        let form = form.clone();
        Callback::from(move |e: Event| {
            let mut next = (*form).clone();
            apply(&mut next, e.target_unchecked_into::<HtmlSelectElement>().value());
            form.set(next);
        })
    };
    let check_field = |apply: fn(&mut PayableFormState, bool)| {
        let form = form.clone();
        Callback::from(move |e: Event| {
            let mut next = (*form).clone();
            apply(&mut next, e.target_unchecked_into::<HtmlInputElement>().checked());
            form.set(next);
        })
    };

    let on_submit = {
        let form = form.clone();
        let form_error = form_error.clone();
        let submitting = submitting.clone();
        let on_submit = props.on_submit.clone();
        let on_close = props.on_close.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            match form.to_input() {
                Ok(input) => {
                    form_error.set(None);
                    submitting.set(true);
                    let form_error = form_error.clone();
                    let submitting = submitting.clone();
                    let on_close = on_close.clone();
                    let done = Callback::from(move |result: Result<(), String>| {
                        submitting.set(false);
                        match result {
                            Ok(()) => on_close.emit(()),
                            Err(e) => form_error.set(Some(e)),
                        }
                    });
                    on_submit.emit((input, done));
                }
                Err(e) => form_error.set(Some(e)),
            }
        })
    };

    let on_cancel = {
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| on_close.emit(()))
    };

    let title = if props.editing.is_some() { "Editar cuenta por pagar" } else { "Nueva cuenta por pagar" };

    html! {
        <div class="modal-backdrop">
            <div class="modal">
                <h2>{title}</h2>
                {if let Some(error) = (*form_error).as_ref() {
                    html! { <div class="form-message error">{error}</div> }
                } else { html! {} }}
                <form class="payable-form" onsubmit={on_submit}>
                    <div class="form-group">
                        <label for="concepto">{"Concepto"}</label>
                        <input id="concepto" type="text" value={form.concept.clone()}
                            onchange={text_field(|f, v| f.concept = v)} />
                    </div>
                    <div class="form-group">
                        <label for="monto_neto">{"Monto neto"}</label>
                        <input id="monto_neto" type="number" step="0.01" min="0.01" value={form.net_amount.clone()}
                            onchange={text_field(|f, v| f.net_amount = v)} />
                    </div>
                    <div class="form-group checkbox">
                        <label>
                            <input type="checkbox" checked={form.requires_tax}
                                onchange={check_field(|f, v| f.requires_tax = v)} />
                            {"Requiere IVA"}
                        </label>
                        {if let Some(total) = form.preview_amount_with_tax() {
                            html! { <span class="hint">{format!("Total: {}", format_currency(total))}</span> }
                        } else { html! {} }}
                    </div>
                    <div class="form-group">
                        <label for="categoria">{"Categoría"}</label>
                        <select id="categoria" onchange={select_field(|f, v| f.category = v)}>
                            <option value="" selected={form.category.is_empty()}>{"Sin categoría"}</option>
                            {for props.categories.iter().map(|c| html! {
                                <option value={c.name.clone()} selected={form.category == c.name}>{&c.name}</option>
                            })}
                        </select>
                    </div>
                    <div class="form-group">
                        <label for="proveedor">{"Proveedor"}</label>
                        <select id="proveedor" onchange={select_field(|f, v| f.provider_id = v)}>
                            <option value="" selected={form.provider_id.is_empty()}>{"Sin proveedor"}</option>
                            {for props.providers.iter().map(|p| html! {
                                <option value={p.id.clone()} selected={form.provider_id == p.id}>{&p.name}</option>
                            })}
                        </select>
                    </div>
                    <div class="form-group">
                        <label for="fecha">{"Fecha de vencimiento"}</label>
                        <input id="fecha" type="date" value={form.due_date.clone()}
                            onchange={text_field(|f, v| f.due_date = v)} />
                    </div>
                    <div class="form-group">
                        <label for="pagos_parciales">{"Pagos parciales"}</label>
                        <input id="pagos_parciales" type="number" step="0.01" min="0" value={form.partial_payments.clone()}
                            onchange={text_field(|f, v| f.partial_payments = v)} />
                    </div>
                    <div class="form-group">
                        <label for="monto_transferencia">{"Monto por transferencia"}</label>
                        <input id="monto_transferencia" type="number" step="0.01" min="0" value={form.transfer_amount.clone()}
                            onchange={text_field(|f, v| f.transfer_amount = v)} />
                    </div>
                    <div class="form-group">
                        <label for="monto_efectivo">{"Monto en efectivo"}</label>
                        <input id="monto_efectivo" type="number" step="0.01" min="0" value={form.cash_amount.clone()}
                            onchange={text_field(|f, v| f.cash_amount = v)} />
                    </div>
                    <div class="form-group checkbox">
                        <label>
                            <input type="checkbox" checked={form.is_paid}
                                onchange={check_field(|f, v| f.is_paid = v)} />
                            {"Pagada"}
                        </label>
                    </div>
                    <div class="form-actions">
                        <button type="button" onclick={on_cancel} disabled={*submitting}>{"Cancelar"}</button>
                        <button type="submit" class="primary" disabled={*submitting}>
                            {if *submitting { "Guardando..." } else { "Guardar" }}
                        </button>
                    </div>
                </form>
            </div>
        </div>
    }
}
