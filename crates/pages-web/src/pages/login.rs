//! Login Page
//!
//! Accepts an access token issued by the identity provider and checks it
//! against `/api/session` before storing it.

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use pages_core::AuthState;

use crate::api;

#[component]
pub fn LoginPage() -> impl IntoView {
    let (token, set_token) = signal(api::stored_token().unwrap_or_default());
    let (error, set_error) = signal(None::<String>);
    let (loading, set_loading) = signal(false);
    let navigate = use_navigate();

    let submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let candidate = token.get().trim().to_string();
        if candidate.is_empty() || loading.get() {
            return;
        }

        set_loading.set(true);
        set_error.set(None);
        let navigate = navigate.clone();
        leptos::task::spawn_local(async move {
            match api::current_session(&candidate).await {
                Ok(AuthState::Authenticated(_)) => {
                    api::store_token(&candidate);
                    navigate("/dashboard", Default::default());
                }
                Ok(AuthState::NotAuthenticated) => {
                    api::clear_token();
                    set_error.set(Some("Token inválido ou expirado.".into()));
                }
                Err(e) => set_error.set(Some(e.to_string())),
            }
            set_loading.set(false);
        });
    };

    view! {
        <div class="login">
            <form class="login-card" on:submit=submit>
                <h2>"Iniciar Sessão"</h2>
                <div class="field">
                    <label for="token">"Token de acesso"</label>
                    <input
                        id="token"
                        type="password"
                        placeholder="O seu token de acesso"
                        prop:value=move || token.get()
                        on:input=move |ev| set_token.set(event_target_value(&ev))
                    />
                </div>
                <Show when=move || error.get().is_some()>
                    <p class="error">{move || error.get().unwrap_or_default()}</p>
                </Show>
                <button type="submit" class="btn btn-primary" disabled=move || loading.get()>
                    {move || if loading.get() { "A iniciar sessão..." } else { "Iniciar Sessão" }}
                </button>
            </form>
        </div>
    }
}
