//! Root application component with routing and context providers.
//!
//! Every navigation lands on `RouteGate`, which runs the guard against the
//! current session and renders either a `<Redirect>` or the page for the
//! path. The session store and request pipeline live in one `AppContext`
//! shared through a local `StoredValue`, since both hold `Rc` handles.

use std::rc::Rc;
use std::time::Duration;

use leptos::prelude::*;
use leptos_meta::{Title, provide_meta_context};
use leptos_router::components::{Redirect, Route, Router, Routes};
use leptos_router::hooks::{use_location, use_navigate};
use leptos_router::{NavigateOptions, StaticSegment, WildcardSegment};

use crate::config::ClientConfig;
use crate::net::fallback::{FallbackResolver, MockFallback, NoFallback};
use crate::net::http::{ApiClient, FallbackPolicy};
use crate::net::transport::default_transport;
use crate::pages::login::LoginPage;
use crate::pages::register::RegisterPage;
use crate::pages::section::{NotFoundPage, SectionPage};
use crate::router::guard::{NavigationDecision, evaluate};
use crate::router::routes::{LOGIN_PATH, REGISTER_PATH, find_route, normalize};
use crate::state::auth::AuthStore;
use crate::state::notice::{NoticeState, Notifier};
use crate::util::storage::default_storage;

/// Handles every page needs: the session store and the request pipeline.
#[derive(Clone)]
pub struct AppContext {
    pub auth: AuthStore,
    pub api: ApiClient,
}

pub type AppHandle = StoredValue<AppContext, LocalStorage>;

/// Fetch the shared `AppContext` inside a component.
pub fn use_app() -> AppContext {
    expect_context::<AppHandle>().get_value()
}

/// Root application component.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let config = ClientConfig::from_build_env().unwrap_or_else(|e| {
        leptos::logging::warn!("invalid build configuration, using defaults: {e}");
        ClientConfig::default()
    });
    let notices = RwSignal::new(NoticeState::default());
    provide_context(notices);

    view! {
        <Title text="PetCare Admin"/>
        <Router>
            <AppRoutes config=config notices=notices/>
        </Router>
        <NoticeTray/>
    }
}

/// Routes plus the app context; needs to sit inside `<Router>` for `use_navigate`.
#[component]
fn AppRoutes(config: ClientConfig, notices: RwSignal<NoticeState>) -> impl IntoView {
    let auth = AuthStore::initialize(default_storage());

    let navigate = use_navigate();
    let navigator = move |path: &str| navigate(path, NavigateOptions::default());

    let fallback: Rc<dyn FallbackResolver> = if config.mock_fallback {
        leptos::logging::log!("mock fallback enabled for role/user endpoints");
        Rc::new(MockFallback::new(Duration::from_millis(u64::from(config.mock_latency_ms))))
    } else {
        Rc::new(NoFallback)
    };

    let notifier: Rc<dyn Notifier> = Rc::new(notices);
    let api = ApiClient::builder(default_transport(&config), auth.clone())
        .notifier(notifier)
        .navigator(Rc::new(navigator))
        .fallback(fallback, FallbackPolicy::from_config(&config))
        .session_cooldown_ms(config.session_notice_cooldown_ms)
        .build();

    provide_context::<AppHandle>(StoredValue::new_local(AppContext { auth, api }));

    view! {
        <Routes fallback=|| view! { <NotFoundPage/> }>
            <Route path=StaticSegment("") view=RouteGate/>
            <Route path=WildcardSegment("any") view=RouteGate/>
        </Routes>
    }
}

/// Runs the navigation guard for the current location.
#[component]
fn RouteGate() -> impl IntoView {
    let location = use_location();
    let app = expect_context::<AppHandle>();

    move || {
        let path = normalize(&location.pathname.get());
        let session = app.with_value(|ctx| ctx.auth.session());
        match evaluate(&path, &session) {
            NavigationDecision::Redirect(to) => view! { <Redirect path=to/> }.into_any(),
            NavigationDecision::Proceed => page_for(&path),
        }
    }
}

fn page_for(path: &str) -> AnyView {
    match find_route(path) {
        Some(route) if route.path == LOGIN_PATH => view! { <LoginPage/> }.into_any(),
        Some(route) if route.path == REGISTER_PATH => view! { <RegisterPage/> }.into_any(),
        Some(route) => view! { <SectionPage route=route/> }.into_any(),
        None => view! { <NotFoundPage/> }.into_any(),
    }
}

/// Transient notices, newest last.
#[component]
fn NoticeTray() -> impl IntoView {
    let notices = expect_context::<RwSignal<NoticeState>>();

    view! {
        <div class="notice-tray">
            <For
                each=move || notices.get().items
                key=|shown| shown.id
                children=move |shown| {
                    let id = shown.id;
                    view! {
                        <div class=shown.notice.level.css_class()>
                            <span>{shown.notice.message}</span>
                            <button
                                class="notice__close"
                                on:click=move |_| notices.update(|state| state.dismiss(id))
                            >
                                "×"
                            </button>
                        </div>
                    }
                }
            />
        </div>
    }
}
