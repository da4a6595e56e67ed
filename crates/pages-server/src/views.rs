//! Server-rendered public pages
//!
//! `GET /lp/{slug}` renders a [`PublicPage`] with `maud`; the visitor contact
//! form posts back to `/lp/{slug}/contact` and works without JavaScript.

use axum::{
    Form,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use serde::Deserialize;

use pages_core::render::{PageVideo, is_web_link, page_path};
use pages_core::{ColorPalette, ContactForm, PublicPage};

use crate::handlers::{ContactError, deliver_contact};
use crate::state::AppState;

const PAGE_CSS: &str = r"
* { box-sizing: border-box; }
body { margin: 0; font-family: system-ui, -apple-system, 'Segoe UI', sans-serif; color: #374151; background: #fff; }
main { max-width: 1100px; margin: 0 auto; padding: 2rem 1rem; }
h1, h2, h3 { color: var(--color-secondary); }
a { color: var(--color-primary); }
a:hover { color: var(--color-secondary); }
header { text-align: center; margin-bottom: 2rem; }
header h1 { font-size: 2.75rem; margin: 0; }
section { margin-bottom: 3rem; }
section > h2 { font-size: 1.75rem; text-align: center; }
.about h2 { text-align: left; }
.about p { color: #4B5563; line-height: 1.7; }
.btn { display: inline-block; border: 0; border-radius: .5rem; padding: .75rem 1.5rem; font-size: 1.1rem; font-weight: 700; color: #fff; cursor: pointer; text-decoration: none; }
.btn-primary { background: var(--color-primary); }
.btn-accent { background: var(--color-accent); }
.btn-accent:hover { color: #fff; }
.copy-link { text-align: center; margin: 2rem 0; }
.gallery { display: grid; grid-template-columns: repeat(auto-fill, minmax(280px, 1fr)); gap: 1.25rem; }
.gallery img { width: 100%; aspect-ratio: 4 / 3; object-fit: cover; border-radius: .5rem; box-shadow: 0 4px 12px rgba(0,0,0,.12); }
.video { aspect-ratio: 16 / 9; background: #E5E7EB; border-radius: .5rem; overflow: hidden; }
.video iframe, .video video { width: 100%; height: 100%; border: 0; }
.benefits { display: grid; grid-template-columns: repeat(auto-fill, minmax(260px, 1fr)); gap: 1.25rem; }
.benefit { display: flex; gap: 1rem; align-items: flex-start; padding: 1.5rem; border-radius: .5rem; box-shadow: 0 2px 8px rgba(0,0,0,.08); }
.benefit .icon { font-size: 1.75rem; color: var(--color-primary); }
.benefit p { margin: 0; color: #4B5563; }
.contact { padding: 2rem; border-radius: .5rem; background: color-mix(in srgb, var(--color-secondary) 6%, white); }
.contact form { max-width: 36rem; margin: 0 auto; display: grid; gap: 1rem; }
.contact label { font-size: .9rem; font-weight: 500; color: var(--color-secondary); }
.contact input, .contact textarea { width: 100%; margin-top: .25rem; padding: .5rem .75rem; border: 1px solid color-mix(in srgb, var(--color-primary) 25%, white); border-radius: .375rem; font: inherit; }
.contact .btn { width: 100%; font-size: 1rem; }
.required { color: var(--color-accent); }
.notice { max-width: 36rem; margin: 0 auto 1rem; padding: .75rem 1rem; border-radius: .375rem; }
.notice.ok { background: #ECFDF5; color: #065F46; }
.notice.error { background: #FEF2F2; color: #991B1B; }
.booking { text-align: center; }
footer { text-align: center; font-size: .875rem; color: #6B7280; border-top: 1px solid #E5E7EB; padding: 1.5rem 0; }
footer p { margin: .25rem 0; }
";

const COPY_LINK_JS: &str = r#"
document.querySelectorAll('[data-copy-link]').forEach(function (button) {
  button.addEventListener('click', function () {
    navigator.clipboard.writeText(window.location.origin + window.location.pathname).then(
      function () { button.textContent = 'Link copiado!'; },
      function () { alert('Não foi possível copiar o link. Por favor, tente manualmente.'); }
    );
  });
});
"#;

/// Outcome shown above the contact form
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContactNotice {
    Sent,
    Failed(String),
}

/// Query string of `GET /lp/{slug}`
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub contact: Option<String>,
}

/// Palette values come from stored records; anything that is not a plain
/// colour literal falls back to the default channel.
fn css_color<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    let plain = !value.is_empty()
        && value.chars().all(|c| {
            c.is_ascii_alphanumeric() || matches!(c, '#' | '(' | ')' | ',' | '.' | '%' | ' ')
        });
    if plain { value } else { fallback }
}

fn palette_css(palette: &ColorPalette) -> String {
    let defaults = ColorPalette::default();
    format!(
        ":root {{ --color-primary: {}; --color-secondary: {}; --color-accent: {}; }}",
        css_color(&palette.primary, &defaults.primary),
        css_color(&palette.secondary, &defaults.secondary),
        css_color(&palette.accent, &defaults.accent),
    )
}

fn base_document(title: &str, palette: &ColorPalette, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="pt" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                style { (PreEscaped(palette_css(palette))) }
                style { (PreEscaped(PAGE_CSS)) }
            }
            body {
                (content)
            }
        }
    }
}

fn render_video(video: &PageVideo) -> Markup {
    html! {
        section.video-section {
            h2 { "Vídeo" }
            div.video {
                @match video {
                    PageVideo::Embed { url } => {
                        iframe src=(url) title="Vídeo da Landing Page"
                            allow="accelerometer; autoplay; clipboard-write; encrypted-media; gyroscope; picture-in-picture"
                            allowfullscreen {}
                    }
                    PageVideo::File { url } => {
                        video controls src=(url) {
                            "O seu navegador não suporta o elemento de vídeo."
                        }
                    }
                }
            }
        }
    }
}

fn render_notice(notice: &ContactNotice) -> Markup {
    html! {
        @match notice {
            ContactNotice::Sent => {
                p.notice.ok { "A sua mensagem foi enviada com sucesso! Entraremos em contacto em breve." }
            }
            ContactNotice::Failed(message) => {
                p.notice.error { (message) }
            }
        }
    }
}

fn render_contact(
    page: &PublicPage,
    notice: Option<&ContactNotice>,
    values: &ContactForm,
) -> Markup {
    html! {
        section.contact id="contacto" {
            h2 { (page.cta_button_text) }
            @if let Some(notice) = notice {
                (render_notice(notice))
            }
            form method="post" action={ (page.path()) "/contact" } {
                div {
                    label for="name" { "Nome Completo " span.required { "*" } }
                    input type="text" name="name" id="name" required placeholder="O seu nome" value=(values.name);
                }
                div {
                    label for="email" { "Endereço de E-mail " span.required { "*" } }
                    input type="email" name="email" id="email" required placeholder="email@exemplo.com" value=(values.email);
                }
                div {
                    label for="phone" { "Telefone (Opcional)" }
                    input type="tel" name="phone" id="phone" placeholder="O seu contacto telefónico" value=(values.phone);
                }
                div {
                    label for="message" { "Mensagem " span.required { "*" } }
                    textarea name="message" id="message" rows="4" required placeholder="Escreva a sua mensagem aqui..." {
                        (values.message)
                    }
                }
                button.btn.btn-primary type="submit" { (page.cta_button_text) }
            }
        }
    }
}

/// Full public page
pub fn render_page(
    page: &PublicPage,
    notice: Option<&ContactNotice>,
    values: &ContactForm,
) -> Markup {
    let content = html! {
        main {
            header {
                h1 { (page.title) }
            }

            div.copy-link {
                button.btn.btn-primary type="button" data-copy-link { "Copiar Link da Página" }
            }

            @if !page.paragraphs.is_empty() {
                section.about {
                    h2 { "Sobre" }
                    @for paragraph in &page.paragraphs {
                        p { (paragraph) }
                    }
                }
            }

            @if !page.gallery.is_empty() {
                section {
                    h2 { "Galeria de Imagens" }
                    div.gallery {
                        @for (index, image) in page.gallery.iter().enumerate() {
                            @let alt = if image.name.is_empty() {
                                format!("Imagem da galeria {}", index + 1)
                            } else {
                                image.name.clone()
                            };
                            img src=(image.url) alt=(alt) loading="lazy";
                        }
                    }
                }
            }

            @if let Some(video) = &page.video {
                (render_video(video))
            }

            @if !page.benefits.is_empty() {
                section {
                    h2 { "Benefícios / Características" }
                    div.benefits {
                        @for benefit in &page.benefits {
                            div.benefit {
                                @if let Some(icon) = &benefit.icon {
                                    span.icon { (icon) }
                                }
                                p { (benefit.text) }
                            }
                        }
                    }
                }
            }

            @if page.contact_form_enabled {
                (render_contact(page, notice, values))
            }

            // Visitor notice for a page that stopped accepting messages
            @if let (false, Some(notice)) = (page.contact_form_enabled, notice) {
                section.contact id="contacto" {
                    (render_notice(notice))
                }
            }

            @if let Some(link) = page.calendly_link.as_deref().filter(|link| is_web_link(link)) {
                section.booking {
                    h2 { "Agende uma Reunião" }
                    a.btn.btn-accent href=(link) target="_blank" rel="noopener noreferrer" { "Agendar Agora" }
                }
            }

            footer {
                p { "Landing Page criada com PrimePages PT." }
                p { "Data de Criação: " (page.created_on) }
            }
        }
        script { (PreEscaped(COPY_LINK_JS)) }
    };

    base_document(&page.title, &page.palette, content)
}

/// Standard not-found page
pub fn render_not_found() -> Markup {
    let content = html! {
        main {
            header {
                h1 { "Página não encontrada" }
            }
            p style="text-align: center" {
                "A página que procura não existe ou não está publicada."
            }
            p style="text-align: center" {
                a href="/" { "Voltar ao início" }
            }
        }
    };
    base_document("Página não encontrada", &ColorPalette::default(), content)
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Html(render_not_found().into_string())).into_response()
}

// ============================================================================
// Handlers
// ============================================================================

/// `GET /lp/{slug}`
pub async fn public_page(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<PageQuery>,
) -> Response {
    let page = match state.resolver.resolve_page(&slug).await {
        Ok(page) => page,
        Err(e) => {
            tracing::debug!(slug = %slug, error = %e, "Public page not served");
            return not_found();
        }
    };

    let notice = (query.contact.as_deref() == Some("sent")).then_some(ContactNotice::Sent);
    Html(render_page(&page, notice.as_ref(), &ContactForm::default()).into_string()).into_response()
}

/// `POST /lp/{slug}/contact`
pub async fn public_contact(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Form(form): Form<ContactForm>,
) -> Response {
    let values = form.clone();
    let error = match deliver_contact(&state, &slug, form).await {
        Ok(_) => {
            return Redirect::to(&format!("{}?contact=sent", page_path(&slug))).into_response();
        }
        Err(ContactError::NotFound) => return not_found(),
        Err(e) => e,
    };

    let status = match error {
        ContactError::Invalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ContactError::Disabled => StatusCode::FORBIDDEN,
        _ => StatusCode::BAD_GATEWAY,
    };

    // The page existed a moment ago; a vanished page falls back to 404
    let Ok(page) = state.resolver.resolve_page(&slug).await else {
        return not_found();
    };
    let notice = ContactNotice::Failed(error.user_message());
    (status, Html(render_page(&page, Some(&notice), &values).into_string())).into_response()
}
