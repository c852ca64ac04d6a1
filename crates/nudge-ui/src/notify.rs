use nudge_core::reminder::Notifier;
use yew::UseStateHandle;

#[derive(
  Clone, Copy, Debug, PartialEq, Eq,
)]
pub enum PermissionState {
  Default,
  Granted,
  Denied,
  Unsupported
}

impl PermissionState {
  pub fn as_label(
    self
  ) -> &'static str {
    match self {
      | Self::Default => {
        "Notification permission not \
         requested"
      }
      | Self::Granted => "",
      | Self::Denied => {
        "Notifications blocked; \
         reminders will not display"
      }
      | Self::Unsupported => {
        "Notifications unsupported \
         in this browser"
      }
    }
  }
}

pub fn browser_permission()
-> PermissionState {
  let Some(window) = web_sys::window()
  else {
    return PermissionState::Unsupported;
  };

  let has_notification =
    js_sys::Reflect::has(
      window.as_ref(),
      &wasm_bindgen::JsValue::from_str(
        "Notification"
      ),
    )
    .ok()
    .unwrap_or(false);

  if !has_notification {
    return PermissionState::Unsupported;
  }

  match web_sys::Notification::permission()
  {
    | web_sys::NotificationPermission::Default => {
      PermissionState::Default
    }
    | web_sys::NotificationPermission::Granted => {
      PermissionState::Granted
    }
    | web_sys::NotificationPermission::Denied => {
      PermissionState::Denied
    }
    | _ => PermissionState::Unsupported
  }
}

/// Ask for permission once, at
/// startup, and only while the
/// browser still reports the
/// undecided state. A previous
/// denial is never re-asked.
pub fn request_permission_once(
  permission_state: UseStateHandle<
    PermissionState,
  >
) {
  let current = browser_permission();
  permission_state.set(current);

  if current != PermissionState::Default
  {
    return;
  }

  match web_sys::Notification::request_permission()
  {
    | Ok(promise) => {
      wasm_bindgen_futures::spawn_local(
        async move {
          let result =
            wasm_bindgen_futures::JsFuture::from(
              promise
            )
            .await;
          match result {
            | Ok(_) => {
              let updated =
                browser_permission();
              tracing::info!(
                permission = ?updated,
                "notification permission \
                 request completed"
              );
              permission_state
                .set(updated);
            }
            | Err(error) => {
              tracing::error!(
                error = ?error,
                "notification permission \
                 request failed"
              );
              permission_state.set(
                browser_permission()
              );
            }
          }
        },
      );
    }
    | Err(error) => {
      tracing::error!(
        error = ?error,
        "failed starting notification \
         permission request"
      );
      permission_state.set(
        browser_permission()
      );
    }
  }
}

/// Best-effort notification
/// display. Skips silently when the
/// API is missing or permission was
/// not granted; that state is never
/// an application error.
pub fn emit_notification(
  title: &str,
  body: &str
) -> bool {
  if browser_permission()
    != PermissionState::Granted
  {
    tracing::debug!(
      "skipping notification because \
       permission is not granted"
    );
    return false;
  }

  let options =
    web_sys::NotificationOptions::new(
    );
  options.set_body(body);
  options.set_icon(
    "/favicon-32x32.png"
  );

  match web_sys::Notification::new_with_options(
    title, &options
  ) {
    | Ok(_) => {
      tracing::info!(
        title,
        "emitted reminder notification"
      );
      true
    }
    | Err(error) => {
      tracing::error!(
        error = ?error,
        title,
        "failed to emit reminder \
         notification"
      );
      false
    }
  }
}

/// Delivery seam the reminder pass
/// fires through in the browser.
pub struct BrowserNotifier;

impl Notifier for BrowserNotifier {
  fn notify(
    &self,
    title: &str,
    body: &str
  ) -> bool {
    emit_notification(title, body)
  }
}
