use chrono::Local;
use shared::CalendarCursor;
use yew::prelude::*;

pub struct UseCalendarResult {
    pub cursor: CalendarCursor,
    pub actions: UseCalendarActions,
}

#[derive(Clone, PartialEq)]
pub struct UseCalendarActions {
    pub prev_month: Callback<MouseEvent>,
    pub next_month: Callback<MouseEvent>,
    pub go_to_today: Callback<MouseEvent>,
}

/// Reference month of the calendar; navigation never touches the data
#[hook]
pub fn use_calendar() -> UseCalendarResult {
    let cursor = use_state(|| CalendarCursor::containing(Local::now().date_naive()));

    let prev_month = {
        let cursor = cursor.clone();
        use_callback(*cursor, move |_: MouseEvent, current| {
            cursor.set(current.previous());
        })
    };

    let next_month = {
        let cursor = cursor.clone();
        use_callback(*cursor, move |_: MouseEvent, current| {
            cursor.set(current.next());
        })
    };

    let go_to_today = {
        let cursor = cursor.clone();
        use_callback((), move |_: MouseEvent, _| {
            cursor.set(CalendarCursor::containing(Local::now().date_naive()));
        })
    };

    UseCalendarResult {
        cursor: *cursor,
        actions: UseCalendarActions {
            prev_month,
            next_month,
            go_to_today,
        },
    }
}
