use shared::{PayableAccount, Provider};
use yew::prelude::*;

use crate::services::format::{format_currency, provider_name};

#[derive(Properties, PartialEq)]
pub struct PayablesTableProps {
    /// Already filtered and sorted
    pub items: Vec<PayableAccount>,
    pub providers: Vec<Provider>,
    pub selected_ids: Vec<String>,
    pub today: chrono::NaiveDate,
    pub on_toggle_select: Callback<String>,
    pub on_select_all: Callback<bool>,
    pub on_edit: Callback<PayableAccount>,
    pub on_partial_payment: Callback<PayableAccount>,
    pub on_toggle_paid: Callback<String>,
    pub on_delete: Callback<PayableAccount>,
}

fn status_label(account: &PayableAccount, today: chrono::NaiveDate) -> (&'static str, &'static str) {
    if account.is_paid {
        ("Pagada", "status paid")
    } else if account.is_overdue(today) {
        ("Vencida", "status overdue")
    } else if account.partial_payments > 0.0 {
        ("Abonada", "status partial")
    } else {
        ("Pendiente", "status pending")
    }
}

#[function_component(PayablesTable)]
pub fn payables_table(props: &PayablesTableProps) -> Html {
    if props.items.is_empty() {
        return html! {
            <div class="empty-state">{"No hay cuentas por pagar con los filtros actuales"}</div>
        };
    }

    let all_selected = props
        .items
        .iter()
        .all(|account| props.selected_ids.contains(&account.id));

    let on_select_all = {
        let on_select_all = props.on_select_all.clone();
        Callback::from(move |_: Event| on_select_all.emit(!all_selected))
    };

    html! {
        <table class="payables-table">
            <thead>
                <tr>
                    <th><input type="checkbox" checked={all_selected} onchange={on_select_all} /></th>
                    <th>{"Fecha"}</th>
                    <th>{"Concepto"}</th>
                    <th>{"Proveedor"}</th>
                    <th>{"Categoría"}</th>
                    <th>{"Monto"}</th>
                    <th>{"Abonado"}</th>
                    <th>{"Saldo"}</th>
                    <th>{"Estado"}</th>
                    <th></th>
                </tr>
            </thead>
            <tbody>
                {for props.items.iter().map(|account| {
                    let (label, class) = status_label(account, props.today);
                    let is_selected = props.selected_ids.contains(&account.id);

                    let on_select = {
                        let id = account.id.clone();
                        let cb = props.on_toggle_select.clone();
                        Callback::from(move |_: Event| cb.emit(id.clone()))
                    };
                    let on_edit = {
                        let account = account.clone();
                        let cb = props.on_edit.clone();
                        Callback::from(move |_: MouseEvent| cb.emit(account.clone()))
                    };
                    let on_pay = {
                        let account = account.clone();
                        let cb = props.on_partial_payment.clone();
                        Callback::from(move |_: MouseEvent| cb.emit(account.clone()))
                    };
                    let on_toggle = {
                        let id = account.id.clone();
                        let cb = props.on_toggle_paid.clone();
                        Callback::from(move |_: MouseEvent| cb.emit(id.clone()))
                    };
                    let on_delete = {
                        let account = account.clone();
                        let cb = props.on_delete.clone();
                        Callback::from(move |_: MouseEvent| cb.emit(account.clone()))
                    };

                    html! {
                        <tr key={account.id.clone()} class={if is_selected { "selected" } else { "" }}>
                            <td><input type="checkbox" checked={is_selected} onchange={on_select} /></td>
                            <td>{account.due_date.format("%d/%m/%Y").to_string()}</td>
                            <td>{&account.concept}</td>
                            <td>{provider_name(&props.providers, account.provider_id.as_deref())}</td>
                            <td>{&account.category}</td>
                            <td>{format_currency(account.amount_with_tax)}</td>
                            <td>{format_currency(account.paid_so_far())}</td>
                            <td>{format_currency(account.outstanding())}</td>
                            <td><span class={class}>{label}</span></td>
                            <td class="row-actions">
                                <button onclick={on_edit}>{"Editar"}</button>
                                {if account.is_paid { html! {} } else {
                                    html! { <button onclick={on_pay}>{"Abonar"}</button> }
                                }}
                                <button onclick={on_toggle}>
                                    {if account.is_paid { "Marcar pendiente" } else { "Marcar pagada" }}
                                </button>
                                <button class="danger" onclick={on_delete}>{"Eliminar"}</button>
                            </td>
                        </tr>
                    }
                })}
            </tbody>
        </table>
    }
}
