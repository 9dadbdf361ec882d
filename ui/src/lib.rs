// The client-side Dioxus application logic.

use dioxus::prelude::*;
use dioxus_logger::tracing;

mod app_state;
mod components;
pub mod format;
pub mod hooks;
mod screens;
pub mod wallet_session;

use api::prefs::user_prefs::UserPrefs;
use api::types::WalletIdentity;
use app_state::AppState;
use components::pico::Container;
use screens::account::AccountScreen;
use wallet_session::WalletSession;

//=============================================================================
// MAIN APPLICATION COMPONENT (Client-side)
//=============================================================================

#[allow(non_snake_case)]
pub fn App() -> Element {
    let page_css = r#"
    * { box-sizing: border-box; }

    /* --- PAGE FRAME --- */
    .app-main-container {
        min-height: 100vh;
        display: flex;
        justify-content: center;
        align-items: center;
    }

    .app-main-container > main {
        max-width: 42rem;
        width: 100%;
    }

    /* --- ACCOUNT CARD --- */
    .account-view {
        display: flex;
        flex-direction: column;
        gap: 2.5rem;
        padding: 1.25rem;
    }

    .account-view table code {
        white-space: nowrap;
    }
"#;

    rsx! {
        document::Meta {
            name: "viewport",
            content: "width=device-width, initial-scale=1.0",
        }
        document::Stylesheet {
            href: "https://cdn.jsdelivr.net/npm/@picocss/pico@2/css/pico.purple.min.css",
        }
        style {
            "{page_css}"
        }
        AppBody {}
    }
}

#[component]
fn AppBody() -> Element {
    // read once; prefs do not change while the app runs.
    let prefs = use_hook(|| {
        let prefs = UserPrefs::from_env();
        tracing::info!("prefs: {:#?}", prefs);
        prefs
    });

    rsx! {
        LoadedApp {
            app_state: AppState::new(prefs),
        }
    }
}

/// Provides the app state and wallet session, then renders the page.
#[component]
fn LoadedApp(app_state: AppState) -> Element {
    use_context_provider(|| app_state.clone());

    let prefs = &app_state.prefs;
    let identity = use_signal(|| initial_identity(prefs));
    let connection = use_signal(|| api::connect(prefs.cluster_preference()));
    let cluster_preference = use_signal(|| prefs.cluster_preference().clone());

    use_context_provider(|| WalletSession {
        identity,
        connection,
        cluster_preference,
    });

    rsx! {
        div {
            class: "app-main-container",
            Container {
                AccountScreen {}
            }
        }
    }
}

/// The wallet to connect on startup, if one is configured and valid.
fn initial_identity(prefs: &UserPrefs) -> Option<WalletIdentity> {
    let address = prefs.watch_address()?;
    WalletIdentity::parse(address)
        .inspect_err(|e| tracing::warn!("ignoring WATCH_ADDRESS {}: {}", address, e))
        .ok()
}
