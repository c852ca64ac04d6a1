use chrono::Utc;
use chrono_tz::Tz;
use nudge_core::datetime::format_due;
use nudge_core::task::Task;
use web_sys::{Event, FocusEvent, HtmlInputElement, KeyboardEvent};
use yew::{Callback, Html, Properties, TargetCast, classes, function_component, html};

#[derive(Properties, PartialEq)]
pub struct TaskRowProps {
    pub task: Task,
    pub timezone: Tz,
    pub on_toggle: Callback<i64>,
    pub on_delete: Callback<i64>,
    pub on_start_edit: Callback<i64>,
    pub on_save_edit: Callback<(i64, String)>,
    pub on_cancel_edit: Callback<i64>,
}

#[function_component(TaskRow)]
pub fn task_row(props: &TaskRowProps) -> Html {
    let task = &props.task;
    let id = task.id;

    let on_toggle = {
        let on_toggle = props.on_toggle.clone();
        Callback::from(move |_: Event| on_toggle.emit(id))
    };
    let on_delete = {
        let on_delete = props.on_delete.clone();
        Callback::from(move |_| on_delete.emit(id))
    };
    let on_start_edit = {
        let on_start_edit = props.on_start_edit.clone();
        Callback::from(move |_| on_start_edit.emit(id))
    };
    let on_edit_keydown = {
        let on_save_edit = props.on_save_edit.clone();
        let on_cancel_edit = props.on_cancel_edit.clone();
        Callback::from(move |event: KeyboardEvent| match event.key().as_str() {
            "Enter" => {
                let input: HtmlInputElement = event.target_unchecked_into();
                on_save_edit.emit((id, input.value()));
            }
            "Escape" => on_cancel_edit.emit(id),
            _ => {}
        })
    };
    let on_edit_blur = {
        let on_save_edit = props.on_save_edit.clone();
        Callback::from(move |event: FocusEvent| {
            let input: HtmlInputElement = event.target_unchecked_into();
            on_save_edit.emit((id, input.value()));
        })
    };

    let row_class = classes!("task-row", task.completed.then_some("completed"));

    let body = if task.editing {
        html! {
            <input
                class="text"
                type="text"
                value={task.text.clone()}
                onkeydown={on_edit_keydown}
                onblur={on_edit_blur}
            />
        }
    } else {
        html! {
            <span class="text" ondblclick={on_start_edit.clone()}>
                { task.text.clone() }
            </span>
        }
    };

    let due_label = task.due.map(|due| {
        let overdue = due <= Utc::now() && !task.completed;
        let class = classes!("due", overdue.then_some("overdue"));
        html! {
            <span class={class}>
                { format_due(due, props.timezone) }
            </span>
        }
    });

    html! {
        <li class={row_class}>
            <input
                type="checkbox"
                checked={task.completed}
                onchange={on_toggle}
            />
            { body }
            { due_label }
            {
                if task.editing {
                    html! {}
                } else {
                    html! {
                        <>
                            <button onclick={on_start_edit}>{ "Edit" }</button>
                            <button onclick={on_delete}>{ "Delete" }</button>
                        </>
                    }
                }
            }
        </li>
    }
}

#[derive(Properties, PartialEq)]
pub struct TaskListProps {
    pub tasks: Vec<Task>,
    pub timezone: Tz,
    pub on_toggle: Callback<i64>,
    pub on_delete: Callback<i64>,
    pub on_start_edit: Callback<i64>,
    pub on_save_edit: Callback<(i64, String)>,
    pub on_cancel_edit: Callback<i64>,
}

#[function_component(TaskList)]
pub fn task_list(props: &TaskListProps) -> Html {
    if props.tasks.is_empty() {
        return html! {
            <p class="status">{ "Nothing to do. Add a task or ask for an idea." }</p>
        };
    }

    html! {
        <ul class="task-list">
            {
                for props.tasks.iter().map(|task| {
                    html! {
                        <TaskRow
                            key={task.id}
                            task={task.clone()}
                            timezone={props.timezone}
                            on_toggle={props.on_toggle.clone()}
                            on_delete={props.on_delete.clone()}
                            on_start_edit={props.on_start_edit.clone()}
                            on_save_edit={props.on_save_edit.clone()}
                            on_cancel_edit={props.on_cancel_edit.clone()}
                        />
                    }
                })
            }
        </ul>
    }
}
