//! Dashboard shell for every signed-in route: sidebar menu, header, and the
//! section placeholder the resource screens mount into.

#[cfg(test)]
#[path = "section_test.rs"]
mod section_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::app::use_app;
use crate::router::routes::{LANDING_PATH, LOGIN_PATH, RouteDescriptor, menu_for};
use crate::state::auth::{AuthStore, Session};

fn page_heading(route: &RouteDescriptor) -> &'static str {
    route.title.unwrap_or(route.name)
}

fn display_name(session: &Session) -> String {
    session.user.as_ref().map_or_else(|| "Guest".to_owned(), |u| u.username.clone())
}

#[component]
pub fn SectionPage(route: &'static RouteDescriptor) -> impl IntoView {
    let auth = StoredValue::new_local(use_app().auth);
    let session = auth.with_value(AuthStore::session);
    let menu = menu_for(session.roles());
    let navigate = use_navigate();

    let on_logout = move |_| {
        auth.with_value(AuthStore::logout);
        navigate(LOGIN_PATH, NavigateOptions::default());
    };

    view! {
        <div class="layout">
            <nav class="layout__sidebar">
                <a class="layout__brand" href=LANDING_PATH>
                    "PetCare"
                </a>
                <ul class="layout__menu">
                    {menu
                        .into_iter()
                        .map(|item| {
                            let class = if item.path == route.path {
                                "layout__menu-item layout__menu-item--active"
                            } else {
                                "layout__menu-item"
                            };
                            view! {
                                <li class=class>
                                    <a href=item.path data-icon=item.icon.unwrap_or_default()>
                                        {page_heading(item)}
                                    </a>
                                </li>
                            }
                        })
                        .collect_view()}
                </ul>
            </nav>
            <div class="layout__main">
                <header class="layout__header">
                    <h1>{page_heading(route)}</h1>
                    <span class="layout__user">{display_name(&session)}</span>
                    <button class="btn layout__logout" on:click=on_logout>
                        "Logout"
                    </button>
                </header>
                <section class="layout__content" data-route=route.name></section>
            </div>
        </div>
    }
}

#[component]
pub fn NotFoundPage() -> impl IntoView {
    view! {
        <div class="not-found">
            <h1>"Page not found"</h1>
            <a href=LANDING_PATH>"Back to dashboard"</a>
        </div>
    }
}
