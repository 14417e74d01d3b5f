use chrono::{Datelike, NaiveDate};
use shared::calendar::{build_calendar_grid, WEEKDAY_LABELS};
use shared::PayableAccount;
use yew::prelude::*;

use crate::hooks::use_calendar::use_calendar;
use crate::services::format::format_currency;

#[derive(Properties, PartialEq)]
pub struct PayableCalendarProps {
    /// Full unfiltered collection
    pub items: Vec<PayableAccount>,
    pub today: NaiveDate,
    pub on_select_day: Callback<NaiveDate>,
}

fn chip_class(account: &PayableAccount, today: NaiveDate) -> &'static str {
    if account.is_paid {
        "payable-chip paid"
    } else if account.is_overdue(today) {
        "payable-chip overdue"
    } else {
        "payable-chip pending"
    }
}

#[function_component(PayableCalendar)]
pub fn payable_calendar(props: &PayableCalendarProps) -> Html {
    let calendar = use_calendar();
    let grid = build_calendar_grid(calendar.cursor, &props.items, props.today);

    html! {
        <div class="calendar">
            <div class="calendar-header">
                <button onclick={calendar.actions.prev_month.clone()}>{"‹"}</button>
                <h3>{calendar.cursor.label()}</h3>
                <button onclick={calendar.actions.next_month.clone()}>{"›"}</button>
                <button class="today-button" onclick={calendar.actions.go_to_today.clone()}>{"Hoy"}</button>
            </div>
            <div class="calendar-grid">
                {for WEEKDAY_LABELS.iter().map(|label| html! { <div class="calendar-weekday">{*label}</div> })}
                {for grid.cells.iter().map(|cell| {
                    let mut class = classes!("calendar-day");
                    if !cell.in_month {
                        class.push("outside");
                    }
                    if cell.is_today {
                        class.push("today");
                    }
                    let on_click = {
                        let date = cell.date;
                        let cb = props.on_select_day.clone();
                        Callback::from(move |_: MouseEvent| cb.emit(date))
                    };
                    html! {
                        <div class={class} onclick={on_click}>
                            <div class="day-number">{cell.date.day()}</div>
                            <div class="day-payables">
                                {for cell.visible_chips().iter().map(|account| html! {
                                    <div class={chip_class(account, props.today)}
                                        title={format!("{} · {}", account.concept, format_currency(account.amount_with_tax))}>
                                        {&account.concept}
                                    </div>
                                })}
                                {if cell.overflow_count() > 0 {
                                    html! { <div class="payable-chip more">{format!("+{}", cell.overflow_count())}</div> }
                                } else { html! {} }}
                            </div>
                        </div>
                    }
                })}
            </div>
        </div>
    }
}
