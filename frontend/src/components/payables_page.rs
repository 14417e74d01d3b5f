use chrono::{Local, NaiveDate};
use shared::csv_export::export_filename;
use shared::filters::{apply_filters, sort_by_due_date_desc};
use shared::totals::compute_totals;
use shared::{PayableAccount, PayableFilter, Resource};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use super::day_summary_modal::DaySummaryModal;
use super::filter_bar::FilterBar;
use super::partial_payment_form::PartialPaymentForm;
use super::payable_calendar::PayableCalendar;
use super::payable_form::PayableForm;
use super::payables_table::PayablesTable;
use super::totals_bar::TotalsBar;
use crate::hooks::use_app_context::AppContext;
use crate::hooks::use_payables::{use_payables, Done};
use crate::hooks::use_reference_data::use_reference_data;
use crate::services::api::ApiClient;
use crate::services::download::{download_text_file, CSV_MIME_TYPE};
use crate::services::export::{plan_export, selected_rows_csv, ExportPlan};
use crate::services::logging::Logger;

#[derive(Clone, Copy, PartialEq)]
enum View {
    Table,
    Calendar,
}

#[derive(Clone, PartialEq)]
enum Dialog {
    None,
    Create,
    Edit(PayableAccount),
    PartialPayment(PayableAccount),
    ConfirmDelete(PayableAccount),
    DaySummary(NaiveDate),
}

pub fn toggle_id(selected: &[String], id: &str) -> Vec<String> {
    if selected.iter().any(|s| s == id) {
        selected.iter().filter(|s| *s != id).cloned().collect()
    } else {
        let mut next = selected.to_vec();
        next.push(id.to_string());
        next
    }
}

#[derive(Properties, PartialEq)]
pub struct PayablesPageProps {
    pub api_client: ApiClient,
}

#[function_component(PayablesPage)]
pub fn payables_page(props: &PayablesPageProps) -> Html {
    let context = use_context::<AppContext>().unwrap_or_default();
    let payables = use_payables(&props.api_client);
    let reference = use_reference_data(&props.api_client);

    let filter = use_state(PayableFilter::default);
    let selected_ids = use_state(Vec::<String>::new);
    let view = use_state(|| View::Table);
    let dialog = use_state(|| Dialog::None);
    let page_error = use_state(|| None::<String>);

    let today = Local::now().date_naive();

    let visible = use_memo(
        (payables.state.items.clone(), (*filter).clone()),
        |(items, filter)| {
            let mut visible = apply_filters(items, filter);
            sort_by_due_date_desc(&mut visible);
            visible
        },
    );
    let totals = compute_totals(&visible);

    let on_filter_change = {
        let filter = filter.clone();
        let selected_ids = selected_ids.clone();
        Callback::from(move |next: PayableFilter| {
            selected_ids.set(Vec::new());
            filter.set(next);
        })
    };

    let on_toggle_select = {
        let selected_ids = selected_ids.clone();
        Callback::from(move |id: String| selected_ids.set(toggle_id(&selected_ids, &id)))
    };

    let on_select_all = {
        let selected_ids = selected_ids.clone();
        let visible = visible.clone();
        Callback::from(move |select: bool| {
            if select {
                selected_ids.set(visible.iter().map(|a| a.id.clone()).collect());
            } else {
                selected_ids.set(Vec::new());
            }
        })
    };

    let open = |make: fn(PayableAccount) -> Dialog| {
        let dialog = dialog.clone();
        Callback::from(move |account: PayableAccount| dialog.set(make(account)))
    };
    let on_edit = open(Dialog::Edit);
    let on_partial_payment = open(Dialog::PartialPayment);
    let on_delete = open(Dialog::ConfirmDelete);

    let on_select_day = {
        let dialog = dialog.clone();
        Callback::from(move |date: NaiveDate| dialog.set(Dialog::DaySummary(date)))
    };

    let close_dialog = {
        let dialog = dialog.clone();
        Callback::from(move |_: ()| dialog.set(Dialog::None))
    };

    let on_update = {
        let update = payables.actions.update.clone();
        let dialog = dialog.clone();
        Callback::from(move |(input, done): (shared::PayableInput, Done)| {
            if let Dialog::Edit(account) = &*dialog {
                update.emit((account.id.clone(), input, done));
            }
        })
    };

    let on_confirm_delete = {
        let remove = payables.actions.remove.clone();
        let dialog = dialog.clone();
        let selected_ids = selected_ids.clone();
        Callback::from(move |_: MouseEvent| {
            if let Dialog::ConfirmDelete(account) = &*dialog {
                let id = account.id.clone();
                let dialog = dialog.clone();
                let selected_ids = selected_ids.clone();
                let done = Callback::from(move |result: Result<(), String>| {
                    if result.is_ok() {
                        selected_ids.set(selected_ids.iter().filter(|s| **s != id).cloned().collect());
                    }
                    dialog.set(Dialog::None);
                });
                remove.emit((account.id.clone(), done));
            }
        })
    };

    let on_export = {
        let api_client = props.api_client.clone();
        let visible = visible.clone();
        let selected_ids = selected_ids.clone();
        let filter = filter.clone();
        let page_error = page_error.clone();
        Callback::from(move |_: MouseEvent| {
            match plan_export(&api_client, &visible, &selected_ids, &filter) {
                ExportPlan::Selected { filename, rows } => {
                    let result = selected_rows_csv(&rows)
                        .map_err(|e| e.to_string())
                        .and_then(|csv| download_text_file(&filename, &csv, CSV_MIME_TYPE));
                    match result {
                        Ok(()) => Logger::info_with_component(
                            "payables_page",
                            &format!("Exported {} selected payables", rows.len()),
                        ),
                        Err(e) => {
                            Logger::error_with_component("payables_page", &format!("Export failed: {}", e));
                            page_error.set(Some(e));
                        }
                    }
                }
                ExportPlan::Server { url } => {
                    let api_client = api_client.clone();
                    let page_error = page_error.clone();
                    spawn_local(async move {
                        let result = api_client.export_payables(&url).await.and_then(|export| {
                            // Client date only when the server sent no usable name
                            let filename = export
                                .filename
                                .unwrap_or_else(|| export_filename(Local::now().date_naive()));
                            download_text_file(&filename, &export.content, CSV_MIME_TYPE)
                        });
                        if let Err(e) = result {
                            Logger::error_with_component("payables_page", &format!("Export failed: {}", e));
                            page_error.set(Some(e));
                        }
                    });
                }
            }
        })
    };

    let on_dismiss_error = {
        let clear_error = payables.actions.clear_error.clone();
        let page_error = page_error.clone();
        Callback::from(move |_: MouseEvent| {
            clear_error.emit(());
            page_error.set(None);
        })
    };

    let set_view = |target: View| {
        let view = view.clone();
        Callback::from(move |_: MouseEvent| view.set(target))
    };
    let on_new = {
        let dialog = dialog.clone();
        Callback::from(move |_: MouseEvent| dialog.set(Dialog::Create))
    };

    let error_message = (*page_error).clone().or_else(|| payables.state.error.clone());
    let can_export = context.can_access(Resource::Exportar);

    html! {
        <main class="payables-page container">
            {if let Some(message) = error_message {
                html! {
                    <div class="error-banner">
                        <span>{message}</span>
                        <button onclick={on_dismiss_error}>{"×"}</button>
                    </div>
                }
            } else { html! {} }}

            <div class="toolbar">
                <button class="primary" onclick={on_new}>{"Nueva cuenta"}</button>
                <div class="view-switch">
                    <button class={classes!((*view == View::Table).then_some("active"))} onclick={set_view(View::Table)}>{"Tabla"}</button>
                    <button class={classes!((*view == View::Calendar).then_some("active"))} onclick={set_view(View::Calendar)}>{"Calendario"}</button>
                </div>
                {if can_export {
                    html! {
                        <button onclick={on_export}>
                            {if selected_ids.is_empty() {
                                "Exportar CSV".to_string()
                            } else {
                                format!("Exportar {} seleccionadas", selected_ids.len())
                            }}
                        </button>
                    }
                } else { html! {} }}
            </div>

            {match *view {
                View::Table => html! {
                    <>
                        <FilterBar
                            filter={(*filter).clone()}
                            providers={reference.providers.clone()}
                            categories={reference.categories.clone()}
                            on_change={on_filter_change}
                        />
                        <TotalsBar totals={totals} />
                        {if payables.state.is_loading && payables.state.items.is_empty() {
                            html! { <div class="loading">{"Cargando cuentas..."}</div> }
                        } else {
                            html! {
                                <PayablesTable
                                    items={(*visible).clone()}
                                    providers={reference.providers.clone()}
                                    selected_ids={(*selected_ids).clone()}
                                    today={today}
                                    on_toggle_select={on_toggle_select}
                                    on_select_all={on_select_all}
                                    on_edit={on_edit}
                                    on_partial_payment={on_partial_payment}
                                    on_toggle_paid={payables.actions.toggle_paid.clone()}
                                    on_delete={on_delete}
                                />
                            }
                        }}
                    </>
                },
                View::Calendar => html! {
                    <PayableCalendar
                        items={payables.state.items.clone()}
                        today={today}
                        on_select_day={on_select_day}
                    />
                },
            }}

            {match &*dialog {
                Dialog::None => html! {},
                Dialog::Create => html! {
                    <PayableForm
                        editing={None::<PayableAccount>}
                        providers={reference.providers.clone()}
                        categories={reference.categories.clone()}
                        today={today}
                        on_submit={payables.actions.create.clone()}
                        on_close={close_dialog.clone()}
                    />
                },
                Dialog::Edit(account) => html! {
                    <PayableForm
                        key={account.id.clone()}
                        editing={Some(account.clone())}
                        providers={reference.providers.clone()}
                        categories={reference.categories.clone()}
                        today={today}
                        on_submit={on_update}
                        on_close={close_dialog.clone()}
                    />
                },
                Dialog::PartialPayment(account) => html! {
                    <PartialPaymentForm
                        key={account.id.clone()}
                        account={account.clone()}
                        on_submit={payables.actions.apply_partial_payment.clone()}
                        on_close={close_dialog.clone()}
                    />
                },
                Dialog::ConfirmDelete(account) => {
                    let on_cancel = {
                        let close_dialog = close_dialog.clone();
                        Callback::from(move |_: MouseEvent| close_dialog.emit(()))
                    };
                    html! {
                        <div class="modal-backdrop">
                            <div class="modal confirm">
                                <p>{format!("¿Eliminar la cuenta \"{}\"?", account.concept)}</p>
                                <div class="form-actions">
                                    <button onclick={on_cancel}>{"Cancelar"}</button>
                                    <button class="danger" onclick={on_confirm_delete}>{"Eliminar"}</button>
                                </div>
                            </div>
                        </div>
                    }
                }
                Dialog::DaySummary(date) => html! {
                    <DaySummaryModal
                        items={payables.state.items.clone()}
                        date={*date}
                        on_close={close_dialog.clone()}
                    />
                },
            }}
        </main>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_id_adds_then_removes() {
        let selected = toggle_id(&[], "a");
        assert_eq!(selected, vec!["a".to_string()]);
        let selected = toggle_id(&selected, "b");
        assert_eq!(selected, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(toggle_id(&selected, "a"), vec!["b".to_string()]);
    }
}
