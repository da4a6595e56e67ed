//! Create Page
//!
//! Holds one [`FormState`] for the lifetime of the page. Every preview URL
//! handed out for a picked image or video is revoked through it, either when
//! the asset is removed or when the page unmounts.

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;
use web_sys::HtmlInputElement;

use pages_core::session::LOGIN_ROUTE;
use pages_core::{
    AssetId, AuthState, ColorChannel, ColorPalette, FormState, PaletteMode, SelectedFile, VideoMode,
};

use crate::api::{self, ApiError};
use crate::components::{Notices, PalettePreview, Thumbnail};
use crate::files::{self, ObjectUrlPreviews, WebFile};
use crate::submission::Submission;

type WebForm = FormState<WebFile, ObjectUrlPreviews>;

#[component]
pub fn CreatePage() -> impl IntoView {
    let form = RwSignal::new_local(WebForm::new(ObjectUrlPreviews));
    let (notices, set_notices) = signal(Vec::<String>::new());
    let (submitting, set_submitting) = signal(false);
    let (dragging, set_dragging) = signal(None::<AssetId>);
    // Gallery order before the last drag, for undo
    let (previous_order, set_previous_order) = signal(None::<Vec<AssetId>>);
    let navigate = use_navigate();

    let notify = move |msg: String| set_notices.update(|msgs| msgs.push(msg));

    on_cleanup(move || {
        form.try_update_untracked(WebForm::teardown);
    });

    // Session check on mount
    {
        let navigate = navigate.clone();
        match api::stored_token() {
            None => navigate(LOGIN_ROUTE, Default::default()),
            Some(token) => leptos::task::spawn_local(async move {
                match api::current_session(&token).await {
                    Ok(AuthState::Authenticated(_)) => {}
                    Ok(AuthState::NotAuthenticated) | Err(ApiError::Unauthorized) => {
                        api::clear_token();
                        navigate(LOGIN_ROUTE, Default::default());
                    }
                    Err(e) => notify(e.to_string()),
                }
            }),
        }
    }

    // ------------------------------------------------------------------------
    // Gallery
    // ------------------------------------------------------------------------

    let on_images = move |ev: leptos::ev::Event| {
        let input: HtmlInputElement = event_target(&ev);
        let picked = WebFile::from_list(input.files());
        let rejections = form.try_update(|f| f.add_images(picked)).unwrap_or_default();
        for rejection in rejections {
            notify(rejection.user_message());
        }
        input.set_value("");
        set_previous_order.set(None);
    };

    let undo_reorder = move |_| {
        if let Some(order) = previous_order.get_untracked() {
            form.update(|f| {
                f.restore_order(&order);
            });
        }
        set_previous_order.set(None);
    };

    let thumbnails = move || {
        form.with(|f| {
            f.gallery()
                .iter()
                .map(|asset| {
                    (
                        asset.id(),
                        asset.preview().as_str().to_string(),
                        asset.file().name().to_string(),
                    )
                })
                .collect::<Vec<_>>()
        })
    };

    let image_count = move || form.with(|f| f.gallery().len());

    // ------------------------------------------------------------------------
    // Video
    // ------------------------------------------------------------------------

    let video_mode = move || form.with(|f| f.video().mode());

    let on_video_file = move |ev: leptos::ev::Event| {
        let input: HtmlInputElement = event_target(&ev);
        let Some(file) = WebFile::from_list(input.files()).into_iter().next() else {
            return;
        };
        if let Some(Err(e)) = form.try_update(|f| f.choose_video_file(file)) {
            notify(e.user_message());
            input.set_value("");
        }
    };

    let video_preview = move || {
        form.with(|f| f.video().file().map(|asset| asset.preview().as_str().to_string()))
    };

    let video_radio = move |mode: VideoMode, label: &'static str| {
        view! {
            <label class="radio">
                <input
                    type="radio"
                    name="video_choice"
                    prop:checked=move || video_mode() == mode
                    on:change=move |_| form.update(|f| f.set_video_mode(mode))
                />
                {label}
            </label>
        }
    };

    // ------------------------------------------------------------------------
    // Description
    // ------------------------------------------------------------------------

    let improve = move |_| {
        let result =
            form.try_update(|f| f.improve_description(&mut files::rng()).map(str::to_string));
        match result {
            Some(Ok(_)) => notify("Texto melhorado com sucesso!".into()),
            Some(Err(e)) => notify(e.user_message()),
            None => {}
        }
    };

    // ------------------------------------------------------------------------
    // Palette
    // ------------------------------------------------------------------------

    let palette = Signal::derive(move || form.with(|f| f.palette().clone()));
    let palette_mode = move || form.with(|f| f.palette_mode());

    let generate = move || {
        form.update(|f| {
            f.generate_palette(&mut files::rng());
        });
        notify("Paleta de cores gerada automaticamente!".into());
    };

    let color_input = move |channel: ColorChannel, id: &'static str, label: &'static str| {
        view! {
            <div class="field color-field">
                <label for=id>{label}</label>
                <input
                    type="color"
                    id=id
                    prop:value=move || form.with(|f| f.palette().get(channel).to_string())
                    on:input=move |ev| form.update(|f| f.set_color(channel, event_target_value(&ev)))
                />
                <input
                    type="text"
                    placeholder="#RRGGBB"
                    prop:value=move || form.with(|f| f.palette().get(channel).to_string())
                    on:change=move |ev| form.update(|f| f.set_color(channel, event_target_value(&ev)))
                />
            </div>
        }
    };

    // ------------------------------------------------------------------------
    // Submission
    // ------------------------------------------------------------------------

    let submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if submitting.get() {
            return;
        }

        let Some(token) = api::stored_token() else {
            notify("Utilizador não autenticado. Por favor, inicie sessão.".into());
            navigate(LOGIN_ROUTE, Default::default());
            return;
        };

        let payload = form.with(|f| f.draft().map(|draft| Submission::from_draft(&draft)));
        let payload = match payload {
            Ok(payload) => payload,
            Err(e) => {
                notify(e.user_message());
                return;
            }
        };

        set_submitting.set(true);
        let navigate = navigate.clone();
        leptos::task::spawn_local(async move {
            // The session is checked again right before the upload
            let outcome = match api::current_session(&token).await {
                Ok(AuthState::Authenticated(_)) => api::create_page(&token, payload).await,
                Ok(AuthState::NotAuthenticated) => Err(ApiError::Unauthorized),
                Err(e) => Err(e),
            };

            match outcome {
                Ok(created) => {
                    for warning in created.warnings {
                        notify(warning.message);
                    }
                    form.try_update_untracked(WebForm::teardown);
                    navigate("/dashboard?success=page_created", Default::default());
                }
                Err(ApiError::Unauthorized) => {
                    api::clear_token();
                    notify(ApiError::Unauthorized.to_string());
                    navigate(LOGIN_ROUTE, Default::default());
                }
                Err(e) => notify(e.to_string()),
            }
            set_submitting.set(false);
        });
    };

    view! {
        <div class="create">
            <h1>"Criar Nova Landing Page"</h1>
            <Notices messages=notices set_messages=set_notices />

            <form class="page-form" on:submit=submit>
                <div class="field">
                    <label for="title">"Título da Página " <span class="required">"*"</span></label>
                    <input
                        type="text"
                        id="title"
                        placeholder="Ex: Apartamento T3 com Vista Mar"
                        prop:value=move || form.with(|f| f.title().to_string())
                        on:input=move |ev| form.update(|f| f.set_title(event_target_value(&ev)))
                    />
                </div>

                <div class="field">
                    <label for="description">"Descrição"</label>
                    <textarea
                        id="description"
                        rows="5"
                        placeholder="Descreva brevemente o seu imóvel, produto ou serviço..."
                        prop:value=move || form.with(|f| f.description().to_string())
                        on:input=move |ev| form.update(|f| f.set_description(event_target_value(&ev)))
                    />
                    <button type="button" class="btn" on:click=improve>"✨ Melhorar com IA"</button>
                    <Show when=move || form.with(|f| f.description_professional().is_some())>
                        <p class="hint">"Versão profissional pronta; será usada na página publicada."</p>
                    </Show>
                </div>

                <div class="field">
                    <label>
                        "Galeria de Imagens (máx. 10, 3MB/cada, JPG/PNG) - Arraste para reordenar"
                    </label>
                    <input
                        type="file"
                        accept="image/jpeg,image/png"
                        multiple
                        disabled=move || { image_count() >= pages_core::asset::MAX_GALLERY_IMAGES }
                        on:change=on_images
                    />
                    <div class="gallery-grid">
                        <For
                            each=thumbnails
                            key=|(id, _, _)| *id
                            children=move |(id, url, name)| {
                                view! {
                                    <div
                                        class="gallery-item"
                                        draggable="true"
                                        class:dragging=move || dragging.get() == Some(id)
                                        on:dragstart=move |_| set_dragging.set(Some(id))
                                        on:dragover=move |ev| ev.prevent_default()
                                        on:drop=move |ev| {
                                            ev.prevent_default();
                                            if let Some(from) = dragging.get_untracked() {
                                                let before = form
                                                    .try_update(|f| f.reorder_images(from, id))
                                                    .flatten();
                                                if before.is_some() {
                                                    set_previous_order.set(before);
                                                }
                                            }
                                            set_dragging.set(None);
                                        }
                                        on:dragend=move |_| set_dragging.set(None)
                                    >
                                        <Thumbnail
                                            url=url
                                            name=name
                                            on_remove=Callback::new(move |()| {
                                                form.update(|f| {
                                                    f.remove_image_id(id);
                                                });
                                                set_previous_order.set(None);
                                            })
                                        />
                                    </div>
                                }
                            }
                        />
                    </div>
                    <Show when=move || previous_order.with(Option::is_some)>
                        <button type="button" class="link" on:click=undo_reorder>"Desfazer reordenação"</button>
                    </Show>
                </div>

                <div class="field">
                    <label>"Vídeo (Opcional)"</label>
                    <div class="radios">
                        {video_radio(VideoMode::None, "Nenhum")}
                        {video_radio(VideoMode::Url, "Link YouTube/Vimeo")}
                        {video_radio(VideoMode::Upload, "Carregar Ficheiro MP4")}
                    </div>
                    {move || match video_mode() {
                        VideoMode::None => ().into_any(),
                        VideoMode::Url => view! {
                            <input
                                type="url"
                                placeholder="https://youtube.com/watch?v=..."
                                prop:value=move || form.with(|f| f.video().url().unwrap_or_default().to_string())
                                on:input=move |ev| form.update(|f| f.set_video_url(event_target_value(&ev)))
                            />
                        }
                        .into_any(),
                        VideoMode::Upload => view! {
                            <input type="file" accept="video/mp4" on:change=on_video_file />
                            {move || video_preview().map(|src| view! { <video controls src=src class="video-preview"></video> })}
                        }
                        .into_any(),
                    }}
                </div>

                <div class="field">
                    <label>"Benefícios / Características"</label>
                    <For
                        each=move || form.with(|f| f.benefits().to_vec())
                        key=|item| item.id
                        children=move |item| {
                            let id = item.id;
                            let position = move || form.with(|f| f.benefits().iter().position(|b| b.id == id));
                            view! {
                                <div class="benefit-row">
                                    <input
                                        type="text"
                                        class="benefit-icon"
                                        placeholder="Ícone (ex: ✔️)"
                                        prop:value=item.icon.clone().unwrap_or_default()
                                        on:input=move |ev| {
                                            if let Some(index) = position() {
                                                form.update(|f| {
                                                    f.set_benefit_icon(index, event_target_value(&ev));
                                                });
                                            }
                                        }
                                    />
                                    <input
                                        type="text"
                                        class="benefit-text"
                                        placeholder="Benefício ou característica"
                                        prop:value=item.text.clone()
                                        on:input=move |ev| {
                                            if let Some(index) = position() {
                                                form.update(|f| {
                                                    f.set_benefit_text(index, event_target_value(&ev));
                                                });
                                            }
                                        }
                                    />
                                    <button
                                        type="button"
                                        class="link-danger"
                                        on:click=move |_| {
                                            if let Some(index) = position() {
                                                form.update(|f| {
                                                    f.remove_benefit(index);
                                                });
                                            }
                                        }
                                    >
                                        "Remover"
                                    </button>
                                </div>
                            }
                        }
                    />
                    <button
                        type="button"
                        class="btn"
                        on:click=move |_| form.update(|f| {
                            f.add_benefit();
                        })
                    >
                        "+ Adicionar mais"
                    </button>
                </div>

                <div class="field">
                    <label for="cta">"Texto do Botão de Contacto (Call to Action)"</label>
                    <input
                        type="text"
                        id="cta"
                        placeholder="Ex: Fale Connosco"
                        prop:value=move || form.with(|f| f.cta_text().to_string())
                        on:input=move |ev| form.update(|f| f.set_cta_text(event_target_value(&ev)))
                    />
                </div>

                <div class="field">
                    <label for="calendly">"Link de Agendamento (Calendly)"</label>
                    <input
                        type="url"
                        id="calendly"
                        placeholder="https://calendly.com/..."
                        prop:value=move || form.with(|f| f.calendly_link().to_string())
                        on:input=move |ev| form.update(|f| f.set_calendly_link(event_target_value(&ev)))
                    />
                </div>

                <fieldset class="field">
                    <legend>"Personalização Visual"</legend>
                    <label>"Modo de Seleção de Cores"</label>
                    <div class="radios">
                        <label class="radio">
                            <input
                                type="radio"
                                name="palette_mode"
                                prop:checked=move || palette_mode() == PaletteMode::Manual
                                on:change=move |_| form.update(|f| f.set_palette_mode(PaletteMode::Manual))
                            />
                            "Escolha Manual"
                        </label>
                        <label class="radio">
                            <input
                                type="radio"
                                name="palette_mode"
                                prop:checked=move || palette_mode() == PaletteMode::Auto
                                on:change=move |_| generate()
                            />
                            "Geração Automática"
                        </label>
                    </div>

                    <Show
                        when=move || palette_mode() == PaletteMode::Auto
                        fallback=move || view! {
                            {color_input(ColorChannel::Primary, "primaryColor", "Cor Primária")}
                            {color_input(ColorChannel::Secondary, "secondaryColor", "Cor Secundária")}
                            {color_input(ColorChannel::Accent, "accentColor", "Cor de Destaque")}
                        }
                    >
                        <p class="hint">
                            "Cores geradas automaticamente. Clique no botão para gerar uma nova combinação."
                        </p>
                        <button type="button" class="btn" on:click=move |_| generate()>"Gerar Nova Paleta"</button>
                    </Show>

                    <PalettePreview palette=palette />
                    <button
                        type="button"
                        class="link"
                        on:click=move |_| form.update(|f| {
                            f.set_palette_mode(PaletteMode::Manual);
                            for channel in [ColorChannel::Primary, ColorChannel::Secondary, ColorChannel::Accent] {
                                f.set_color(channel, ColorPalette::default().get(channel));
                            }
                        })
                    >
                        "Repor cores padrão"
                    </button>
                </fieldset>

                <div class="actions">
                    <a href="/dashboard" class="btn">"Cancelar"</a>
                    <button type="submit" class="btn btn-primary" disabled=move || submitting.get()>
                        {move || if submitting.get() { "A criar..." } else { "Criar Landing Page" }}
                    </button>
                </div>
            </form>
        </div>
    }
}
