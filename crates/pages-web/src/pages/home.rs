//! Home Page

use leptos::prelude::*;

#[component]
pub fn HomePage() -> impl IntoView {
    view! {
        <div class="home">
            <header class="hero">
                <h1>"PrimePages PT"</h1>
                <p class="tagline">"Landing pages para imóveis, produtos e serviços, prontas em minutos"</p>
                <div class="cta">
                    <a href="/dashboard/create" class="btn btn-primary">"Criar Nova Landing Page"</a>
                    <a href="/dashboard" class="btn">"Painel de Controlo"</a>
                </div>
            </header>

            <section class="features">
                <div class="feature">
                    <h3>"🖼️ Galeria"</h3>
                    <p>"Até 10 imagens JPG/PNG. Arraste para definir a ordem."</p>
                </div>
                <div class="feature">
                    <h3>"🎬 Vídeo"</h3>
                    <p>"Link do YouTube ou Vimeo, ou um ficheiro MP4 até 50MB."</p>
                </div>
                <div class="feature">
                    <h3>"✉️ Contacto"</h3>
                    <p>"Formulário de contacto e agendamento em cada página publicada."</p>
                </div>
            </section>
        </div>
    }
}
