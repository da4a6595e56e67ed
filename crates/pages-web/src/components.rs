//! UI Components

use leptos::prelude::*;

use pages_core::ColorPalette;

/// Stack of dismissable notices
#[component]
pub fn Notices(
    messages: ReadSignal<Vec<String>>,
    set_messages: WriteSignal<Vec<String>>,
) -> impl IntoView {
    view! {
        <div class="notices">
            <For
                each=move || messages.get().into_iter().enumerate()
                key=|(i, msg)| format!("{i}-{msg}")
                children=move |(i, msg)| {
                    view! {
                        <div class="notice">
                            <span>{msg}</span>
                            <button
                                type="button"
                                on:click=move |_| set_messages.update(|msgs| {
                                    if i < msgs.len() {
                                        msgs.remove(i);
                                    }
                                })
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

/// Three swatches for the current palette
#[component]
pub fn PalettePreview(palette: Signal<ColorPalette>) -> impl IntoView {
    let swatch = move |label: &'static str, pick: fn(&ColorPalette) -> String| {
        view! {
            <div class="swatch">
                <span
                    class="swatch-color"
                    style:background-color=move || palette.with(pick)
                ></span>
                <span class="swatch-label">{label}</span>
            </div>
        }
    };

    view! {
        <div class="palette-preview">
            <h4>"Pré-visualização da Paleta"</h4>
            <div class="swatches">
                {swatch("Primária", |p| p.primary.clone())}
                {swatch("Secundária", |p| p.secondary.clone())}
                {swatch("Destaque", |p| p.accent.clone())}
            </div>
        </div>
    }
}

/// Gallery thumbnail with its remove button
#[component]
pub fn Thumbnail(url: String, name: String, on_remove: Callback<()>) -> impl IntoView {
    view! {
        <figure class="thumb">
            <img src=url alt=name.clone() />
            <figcaption>{name}</figcaption>
            <button type="button" class="thumb-remove" on:click=move |ev| {
                ev.stop_propagation();
                on_remove.run(());
            }>
                "X"
            </button>
        </figure>
    }
}
