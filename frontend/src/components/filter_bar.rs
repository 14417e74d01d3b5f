use chrono::NaiveDate;
use shared::{Category, MonthFilter, PayableFilter, Provider, StatusFilter};
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

use shared::calendar::month_name;

#[derive(Properties, PartialEq)]
pub struct FilterBarProps {
    pub filter: PayableFilter,
    pub providers: Vec<Provider>,
    pub categories: Vec<Category>,
    pub on_change: Callback<PayableFilter>,
}

pub fn optional_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

/// Unparseable or negative amounts clear the bound
pub fn optional_amount(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite() && *amount >= 0.0)
}

pub fn optional_text(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn input_value(e: &Event) -> String {
    e.target_unchecked_into::<HtmlInputElement>().value()
}

fn select_value(e: &Event) -> String {
    e.target_unchecked_into::<HtmlSelectElement>().value()
}

/// Emit a copy of the filter with one field changed
fn updater<F>(filter: &PayableFilter, on_change: &Callback<PayableFilter>, read: fn(&Event) -> String, apply: F) -> Callback<Event>
where
    F: Fn(&mut PayableFilter, String) + 'static,
{
    let filter = filter.clone();
    let on_change = on_change.clone();
    Callback::from(move |e: Event| {
        let mut next = filter.clone();
        apply(&mut next, read(&e));
        on_change.emit(next);
    })
}

#[function_component(FilterBar)]
pub fn filter_bar(props: &FilterBarProps) -> Html {
    let filter = &props.filter;
    let on_change = &props.on_change;

    let on_month = updater(filter, on_change, select_value, |f, v| {
        f.month = MonthFilter::parse(&v).unwrap_or_default();
    });
    let on_status = updater(filter, on_change, select_value, |f, v| {
        f.status = StatusFilter::parse(&v).unwrap_or_default();
    });
    let on_start = updater(filter, on_change, input_value, |f, v| f.date_start = optional_date(&v));
    let on_end = updater(filter, on_change, input_value, |f, v| f.date_end = optional_date(&v));
    let on_min = updater(filter, on_change, input_value, |f, v| f.min_amount = optional_amount(&v));
    let on_max = updater(filter, on_change, input_value, |f, v| f.max_amount = optional_amount(&v));
    let on_provider = updater(filter, on_change, select_value, |f, v| f.provider_id = optional_text(&v));
    let on_category = updater(filter, on_change, select_value, |f, v| f.category = optional_text(&v));

    let on_clear = {
        let on_change = on_change.clone();
        Callback::from(move |_: MouseEvent| on_change.emit(PayableFilter::default()))
    };

    let date_value = |date: Option<NaiveDate>| date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default();
    let amount_value = |amount: Option<f64>| amount.map(|a| a.to_string()).unwrap_or_default();

    html! {
        <div class="filter-bar">
            <select onchange={on_month}>
                <option value={MonthFilter::ALL_SENTINEL} selected={filter.month == MonthFilter::All}>{"Todos los meses"}</option>
                {for (1..=12u32).map(|m| html! {
                    <option value={m.to_string()} selected={filter.month == MonthFilter::Month(m)}>{month_name(m)}</option>
                })}
            </select>
            <input type="date" title="Desde" value={date_value(filter.date_start)} onchange={on_start} />
            <input type="date" title="Hasta" value={date_value(filter.date_end)} onchange={on_end} />
            <select onchange={on_status}>
                <option value="" selected={filter.status == StatusFilter::All}>{"Todas"}</option>
                <option value="pagadas" selected={filter.status == StatusFilter::Paid}>{"Pagadas"}</option>
                <option value="pendientes" selected={filter.status == StatusFilter::Pending}>{"Pendientes"}</option>
            </select>
            <input type="number" step="0.01" min="0" placeholder="Monto mínimo"
                value={amount_value(filter.min_amount)} onchange={on_min} />
            <input type="number" step="0.01" min="0" placeholder="Monto máximo"
                value={amount_value(filter.max_amount)} onchange={on_max} />
            <select onchange={on_provider}>
                <option value="" selected={filter.provider_id.is_none()}>{"Todos los proveedores"}</option>
                {for props.providers.iter().map(|p| html! {
                    <option value={p.id.clone()} selected={filter.provider_id.as_deref() == Some(p.id.as_str())}>{&p.name}</option>
                })}
            </select>
            <select onchange={on_category}>
                <option value="" selected={filter.category.is_none()}>{"Todas las categorías"}</option>
                {for props.categories.iter().map(|c| html! {
                    <option value={c.name.clone()} selected={filter.category.as_deref() == Some(c.name.as_str())}>{&c.name}</option>
                })}
            </select>
            {if filter.is_active() {
                html! { <button class="clear-filters" onclick={on_clear}>{"Limpiar filtros"}</button> }
            } else { html! {} }}
        </div>
    }
}
