use chrono::Utc;
use gloo::timers::callback::Interval;
use nudge_core::datetime::parse_due_input;
use nudge_core::ideas::IdeaGenerator;
use nudge_core::reminder::run_reminder_pass;
use nudge_core::store::TaskStore;
use web_sys::{
  HtmlInputElement,
  InputEvent,
  SubmitEvent
};
use yew::{
  Callback,
  Html,
  TargetCast,
  function_component,
  html,
  use_effect_with,
  use_mut_ref,
  use_state
};

use crate::components::TaskList;
use crate::config;
use crate::notify::{
  self,
  BrowserNotifier,
  PermissionState
};

/// Key baked in at build time, if
/// the build environment had one.
/// The runtime environment is
/// consulted as a fallback inside
/// the core crate and is empty in
/// the browser.
fn compile_time_api_key()
-> Option<String> {
  option_env!("GEMINI_API_KEY")
    .map(str::to_string)
}

#[function_component(App)]
pub fn app() -> Html {
  let app_config =
    use_state(config::app_config);
  let timezone = config::app_timezone(
    &app_config
  );

  // The store is the single owner
  // of task state; every mutation
  // funnels through it. The tick
  // only forces a re-render after
  // one.
  let store = use_mut_ref(|| {
    TaskStore::seeded(Utc::now())
  });
  let refresh_tick =
    use_state(|| 0_u64);

  let new_text =
    use_state(String::new);
  let new_due = use_state(String::new);
  let loading = use_state(|| false);
  let error =
    use_state(|| None::<String>);
  let permission = use_state(
    notify::browser_permission
  );
  let generator = {
    let model = app_config
      .ideas
      .model
      .clone();
    use_state(move || {
      IdeaGenerator::from_key(
        compile_time_api_key(),
        &model
      )
    })
  };

  {
    let store = store.clone();
    let refresh_tick =
      refresh_tick.clone();
    let permission =
      permission.clone();
    let reminders = app_config
      .reminders
      .clone();
    use_effect_with((), move |_| {
      notify::request_permission_once(
        permission
      );

      let interval = reminders
        .enabled
        .then(|| {
          Interval::new(
            reminders.interval_ms,
            move || {
              let fired =
                run_reminder_pass(
                  &mut store
                    .borrow_mut(),
                  Utc::now(),
                  &BrowserNotifier
                );
              if fired > 0 {
                refresh_tick.set(
                  (*refresh_tick)
                    .wrapping_add(1)
                );
              }
            }
          )
        });

      move || drop(interval)
    });
  }

  let on_new_text_input = {
    let new_text = new_text.clone();
    Callback::from(
      move |event: InputEvent| {
        let input: HtmlInputElement =
          event.target_unchecked_into();
        new_text.set(input.value());
      }
    )
  };

  let on_new_due_input = {
    let new_due = new_due.clone();
    Callback::from(
      move |event: InputEvent| {
        let input: HtmlInputElement =
          event.target_unchecked_into();
        new_due.set(input.value());
      }
    )
  };

  let on_add = {
    let store = store.clone();
    let refresh_tick =
      refresh_tick.clone();
    let new_text = new_text.clone();
    let new_due = new_due.clone();
    let error = error.clone();
    Callback::from(
      move |event: SubmitEvent| {
        event.prevent_default();

        let due = match parse_due_input(
          &new_due, timezone
        ) {
          | Ok(due) => due,
          | Err(err) => {
            tracing::error!(
              error = %err,
              "rejected due date input"
            );
            error.set(Some(
              "That due date could \
               not be understood."
                .to_string()
            ));
            return;
          }
        };

        let added = store
          .borrow_mut()
          .add(
            &new_text,
            due,
            Utc::now()
          );
        if added.is_some() {
          new_text
            .set(String::new());
          new_due.set(String::new());
          error.set(None);
          refresh_tick.set(
            (*refresh_tick)
              .wrapping_add(1)
          );
        }
      }
    )
  };

  let on_toggle = {
    let store = store.clone();
    let refresh_tick =
      refresh_tick.clone();
    Callback::from(move |id: i64| {
      store
        .borrow_mut()
        .toggle_complete(id);
      refresh_tick.set(
        (*refresh_tick)
          .wrapping_add(1)
      );
    })
  };

  let on_delete = {
    let store = store.clone();
    let refresh_tick =
      refresh_tick.clone();
    Callback::from(move |id: i64| {
      store.borrow_mut().delete(id);
      refresh_tick.set(
        (*refresh_tick)
          .wrapping_add(1)
      );
    })
  };

  let on_start_edit = {
    let store = store.clone();
    let refresh_tick =
      refresh_tick.clone();
    Callback::from(move |id: i64| {
      store
        .borrow_mut()
        .start_editing(id);
      refresh_tick.set(
        (*refresh_tick)
          .wrapping_add(1)
      );
    })
  };

  let on_save_edit = {
    let store = store.clone();
    let refresh_tick =
      refresh_tick.clone();
    Callback::from(
      move |(id, text): (
        i64,
        String
      )| {
        store
          .borrow_mut()
          .save_edit(id, &text);
        refresh_tick.set(
          (*refresh_tick)
            .wrapping_add(1)
        );
      }
    )
  };

  let on_cancel_edit = {
    let store = store.clone();
    let refresh_tick =
      refresh_tick.clone();
    Callback::from(move |id: i64| {
      store
        .borrow_mut()
        .cancel_edit(id);
      refresh_tick.set(
        (*refresh_tick)
          .wrapping_add(1)
      );
    })
  };

  let on_generate = {
    let generator = generator.clone();
    let loading = loading.clone();
    let error = error.clone();
    let new_text = new_text.clone();
    Callback::from(move |_| {
      if *loading {
        return;
      }
      loading.set(true);
      error.set(None);

      let generator =
        (*generator).clone();
      let loading = loading.clone();
      let error = error.clone();
      let new_text = new_text.clone();
      wasm_bindgen_futures::spawn_local(
        async move {
          match generator
            .generate()
            .await
          {
            | Ok(idea) => {
              new_text.set(idea);
            }
            | Err(err) => {
              error.set(Some(
                err.to_string()
              ));
            }
          }
          // Cleared on success and
          // failure alike.
          loading.set(false);
        }
      );
    })
  };

  let view_tasks =
    store.borrow().sorted_view();
  let permission_label =
    (*permission).as_label();

  html! {
    <main>
      <h1>{ "Nudge" }</h1>

      <form
        class="add-form"
        onsubmit={on_add}
      >
        <input
          type="text"
          placeholder="What needs doing?"
          value={(*new_text).clone()}
          oninput={on_new_text_input}
        />
        <input
          type="datetime-local"
          value={(*new_due).clone()}
          oninput={on_new_due_input}
        />
        <button type="submit">
          { "Add" }
        </button>
        <button
          type="button"
          onclick={on_generate}
          disabled={*loading}
        >
          {
            if *loading {
              "Thinking..."
            } else {
              "Need an idea?"
            }
          }
        </button>
      </form>

      if let Some(message) =
        (*error).clone()
      {
        <p class="error">
          { message }
        </p>
      }

      if *permission
        != PermissionState::Granted
        && !permission_label.is_empty()
      {
        <p class="status">
          { permission_label }
        </p>
      }

      <TaskList
        tasks={view_tasks}
        timezone={timezone}
        on_toggle={on_toggle}
        on_delete={on_delete}
        on_start_edit={on_start_edit}
        on_save_edit={on_save_edit}
        on_cancel_edit={on_cancel_edit}
      />
    </main>
  }
}
