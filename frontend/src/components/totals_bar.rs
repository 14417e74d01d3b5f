use shared::PayableTotals;
use yew::prelude::*;

use crate::services::format::format_currency;

#[derive(Properties, PartialEq)]
pub struct TotalsBarProps {
    pub totals: PayableTotals,
}

#[function_component(TotalsBar)]
pub fn totals_bar(props: &TotalsBarProps) -> Html {
    let totals = &props.totals;
    html! {
        <div class="totals-bar">
            <div class="total paid">
                <span class="total-label">{"Pagado"}</span>
                <span class="total-amount">{format_currency(totals.total_paid)}</span>
            </div>
            <div class="total outstanding">
                <span class="total-label">{"Por pagar"}</span>
                <span class="total-amount">{format_currency(totals.total_outstanding)}</span>
            </div>
            <div class="total count">
                {format!("{} cuentas ({} pagadas, {} pendientes)", totals.count, totals.paid_count, totals.pending_count)}
            </div>
        </div>
    }
}
