//! Dashboard Page

use leptos::prelude::*;
use leptos_router::hooks::{use_navigate, use_query_map};

use pages_core::PageSummary;
use pages_core::render::page_path;
use pages_core::session::LOGIN_ROUTE;

use crate::api::{self, ApiError};

#[component]
pub fn DashboardPage() -> impl IntoView {
    let (pages, set_pages) = signal(Vec::<PageSummary>::new());
    let (loading, set_loading) = signal(true);
    let (error, set_error) = signal(None::<String>);
    let query = use_query_map();
    let navigate = use_navigate();

    let created = move || query.read().get("success").as_deref() == Some("page_created");

    match api::stored_token() {
        None => navigate(LOGIN_ROUTE, Default::default()),
        Some(token) => leptos::task::spawn_local(async move {
            match api::list_pages(&token).await {
                Ok(list) => set_pages.set(list),
                Err(ApiError::Unauthorized) => {
                    api::clear_token();
                    navigate(LOGIN_ROUTE, Default::default());
                }
                Err(e) => set_error.set(Some(e.to_string())),
            }
            set_loading.set(false);
        }),
    }

    view! {
        <div class="dashboard">
            <div class="dashboard-header">
                <h1>"Painel de Controlo"</h1>
                <a href="/dashboard/create" class="btn btn-primary">"Criar Nova Landing Page"</a>
            </div>

            <Show when=created>
                <p class="notice success">"Landing page criada com sucesso!"</p>
            </Show>

            <h2>"As Minhas Landing Pages"</h2>

            <Show when=move || error.get().is_some()>
                <p class="error">{move || error.get().unwrap_or_default()}</p>
            </Show>

            <Show
                when=move || !pages.get().is_empty()
                fallback=move || view! {
                    <Show when=move || !loading.get()>
                        <p class="empty">
                            "Ainda não criou nenhuma landing page. "
                            <a href="/dashboard/create">"Crie a sua primeira!"</a>
                        </p>
                    </Show>
                }
            >
                <ul class="page-list">
                    <For
                        each=move || pages.get()
                        key=|page| page.slug.clone()
                        children=move |page| {
                            let path = page_path(&page.slug);
                            view! {
                                <li class="page-card">
                                    <h3>{page.title.clone()}</h3>
                                    <p class="meta">
                                        {format!("Criada em: {}", page.created_at.format("%d/%m/%Y"))}
                                    </p>
                                    <a href=path target="_blank" rel="noopener">"Ver"</a>
                                </li>
                            }
                        }
                    />
                </ul>
            </Show>
        </div>
    }
}
