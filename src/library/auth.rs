//! Authorization check-and-request flow
//!
//! One static entry point a host calls before presenting the picker.
//! Denial is never fatal: the user gets a blocking alert with a
//! cancel/open-settings choice and the host receives `false`.

use log::debug;

use super::types::Authorization;
use super::PhotoLibrary;
use crate::ui::traits::AlertPresenter;
use crate::ui::types::AlertChoice;

/// Check library authorization, requesting it if still undetermined
///
/// - `Authorized`: `respond(true)` immediately.
/// - `NotDetermined`: forwards to [`PhotoLibrary::request_authorization`];
///   the response may arrive on another thread.
/// - `Denied` / `Restricted`: presents the blocking denied alert; an
///   Open-Settings choice jumps to the system settings pane. Either way
///   `respond(false)`.
pub fn ensure_authorized(
    library: &dyn PhotoLibrary,
    alerts: &mut dyn AlertPresenter,
    respond: impl FnOnce(bool) + Send + 'static,
) {
    match library.authorization() {
        Authorization::Authorized => respond(true),
        Authorization::NotDetermined => {
            debug!("photo library authorization not determined, requesting");
            library.request_authorization(Box::new(respond));
        }
        Authorization::Denied | Authorization::Restricted => {
            if alerts.present_denied_alert() == AlertChoice::OpenSettings {
                alerts.open_settings();
            }
            respond(false);
        }
    }
}
