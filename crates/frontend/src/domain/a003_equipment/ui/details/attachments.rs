use contracts::system::uploads::{file_icon, format_file_size, UploadKind, UploadResponse};
use leptos::html;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::domain::a003_equipment::api;
use crate::shared::components::feedback::{confirm, Empty};
use crate::shared::date_utils::format_datetime;
use crate::shared::icons::icon;
use crate::shared::toast;

/// Documents and photos attached to one equipment item
#[component]
pub fn AttachmentsCard(equipment_id: i32, #[prop(into)] can_manage: Signal<bool>) -> impl IntoView {
    let attachments = RwSignal::new(Vec::<UploadResponse>::new());
    let kind = RwSignal::new(UploadKind::Document);
    let uploading = RwSignal::new(false);
    let file_input: NodeRef<html::Input> = NodeRef::new();

    let load = move || {
        spawn_local(async move {
            match api::fetch_attachments(equipment_id).await {
                Ok(list) => attachments.set(list),
                Err(e) => toast::error(e),
            }
        });
    };
    load();

    let upload = move |_| {
        let Some(input) = file_input.get() else {
            return;
        };
        let Some(file) = input.files().and_then(|files| files.get(0)) else {
            toast::error("Veuillez choisir un fichier");
            return;
        };
        let selected_kind = kind.get_untracked();
        uploading.set(true);
        spawn_local(async move {
            match api::upload_attachment(equipment_id, selected_kind, file).await {
                Ok(uploaded) => {
                    toast::success(format!("{} téléversé", uploaded.original_name));
                    input.set_value("");
                    load();
                }
                Err(e) => toast::error(e),
            }
            uploading.set(false);
        });
    };

    let remove = move |upload: UploadResponse| {
        if !confirm(&format!("Supprimer « {} » ?", upload.original_name)) {
            return;
        }
        spawn_local(async move {
            match api::delete_attachment(&upload.id.to_string()).await {
                Ok(()) => {
                    toast::success("Pièce jointe supprimée");
                    attachments.update(|list| list.retain(|a| a.id != upload.id));
                }
                Err(e) => toast::error(e),
            }
        });
    };

    view! {
        <div class="card">
            <div class="card__header">
                <h3 class="card__title">{icon("upload")}" Pièces jointes"</h3>
            </div>
            <div class="card__body">
                <Show when=move || can_manage.get()>
                    <div class="upload-form">
                        <select
                            prop:value=move || kind.get().as_str()
                            on:change=move |ev| {
                                if let Ok(k) = event_target_value(&ev).parse::<UploadKind>() {
                                    kind.set(k);
                                }
                            }
                        >
                            <option value="document">"Document (PDF, Word, Excel)"</option>
                            <option value="image">"Image (JPG, PNG, GIF, WEBP)"</option>
                        </select>
                        <input type="file" node_ref=file_input />
                        <button
                            class="button button--primary"
                            on:click=upload
                            disabled=move || uploading.get()
                        >
                            {move || if uploading.get() { "Envoi..." } else { "Téléverser" }}
                        </button>
                    </div>
                </Show>

                <Show
                    when=move || !attachments.with(Vec::is_empty)
                    fallback=|| view! { <Empty message="Aucune pièce jointe" /> }
                >
                    <ul class="attachment-list">
                        {move || attachments.get().into_iter().map(|a| {
                            let for_remove = a.clone();
                            view! {
                                <li class="attachment-list__item">
                                    <span class="attachment-list__icon">{file_icon(&a.mime_type)}</span>
                                    <a href=a.url.clone() target="_blank" rel="noopener">{a.original_name.clone()}</a>
                                    <span class="text-secondary">
                                        {format!("{} • {}", format_file_size(a.size), format_datetime(a.created_at))}
                                    </span>
                                    {move || can_manage.get().then(|| {
                                        let upload = for_remove.clone();
                                        view! {
                                            <button
                                                class="button button--link button--danger"
                                                title="Supprimer"
                                                on:click=move |_| remove(upload.clone())
                                            >
                                                {icon("delete")}
                                            </button>
                                        }
                                    })}
                                </li>
                            }
                        }).collect_view()}
                    </ul>
                </Show>
            </div>
        </div>
    }
}
