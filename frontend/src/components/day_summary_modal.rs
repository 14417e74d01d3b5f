use chrono::{Local, NaiveDate};
use shared::calendar::{payables_on, summarize_day};
use shared::{PayableAccount, SummaryBucket};
use yew::prelude::*;

use crate::services::format::format_currency;

#[derive(Properties, PartialEq)]
pub struct DaySummaryModalProps {
    pub items: Vec<PayableAccount>,
    pub date: NaiveDate,
    pub on_close: Callback<()>,
}

fn bucket_row(label: &str, class: &'static str, bucket: &SummaryBucket) -> Html {
    html! {
        <div class={classes!("summary-row", class)}>
            <span class="summary-label">{label}</span>
            <span class="summary-count">{bucket.count}</span>
            <span class="summary-amount">{format_currency(bucket.amount)}</span>
        </div>
    }
}

#[function_component(DaySummaryModal)]
pub fn day_summary_modal(props: &DaySummaryModalProps) -> Html {
    // Overdue is relative to the moment of rendering, not to when the page loaded
    let today = Local::now().date_naive();
    let summary = summarize_day(&props.items, props.date, today);
    let accounts = payables_on(&props.items, props.date);

    let on_close = {
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| on_close.emit(()))
    };

    html! {
        <div class="modal-backdrop">
            <div class="modal day-summary">
                <h2>{props.date.format("%d/%m/%Y").to_string()}</h2>
                {bucket_row("Pagadas", "paid", &summary.paid)}
                {bucket_row("Por pagar", "pending", &summary.payable)}
                {bucket_row("Vencidas", "overdue", &summary.overdue)}
                {if accounts.is_empty() {
                    html! { <p class="empty-state">{"Sin cuentas para este día"}</p> }
                } else {
                    html! {
                        <ul class="day-payables">
                            {for accounts.iter().map(|account| html! {
                                <li key={account.id.clone()}>
                                    {format!("{} · {}", account.concept, format_currency(account.amount_with_tax))}
                                </li>
                            })}
                        </ul>
                    }
                }}
                <div class="form-actions">
                    <button onclick={on_close}>{"Cerrar"}</button>
                </div>
            </div>
        </div>
    }
}
