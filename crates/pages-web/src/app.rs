//! Main App Component

use leptos::prelude::*;
use leptos_router::{components::*, path};

use crate::pages::{CreatePage, DashboardPage, HomePage, LoginPage};

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    view! {
        <Router>
            <main class="app">
                <Routes fallback=|| view! { <p>"Página não encontrada"</p> }>
                    <Route path=path!("/") view=HomePage />
                    <Route path=path!("/auth/login") view=LoginPage />
                    <Route path=path!("/dashboard") view=DashboardPage />
                    <Route path=path!("/dashboard/create") view=CreatePage />
                </Routes>
            </main>
        </Router>
    }
}
