use gloo_file::futures::read_as_bytes;
use wasm_bindgen::JsCast;
use web_sys::HtmlInputElement;
use yew::platform::spawn_local;
use yew::prelude::*;

use common::format::{format_bytes, format_optional_date};
use common::model::{Document, DocumentKind, DocumentList};
use common::requests::{UploadFile, ALLOWED_EXTENSIONS};
use common::ApiError;

use crate::components::helpers::show_toast;
use crate::platform::ClientHandle;

#[derive(Properties, PartialEq)]
pub struct DocumentsProps {
    pub client: ClientHandle,
}

pub enum Msg {
    Load,
    Loaded(Result<DocumentList, ApiError>),
    OpenPicker,
    FilesSelected(Vec<web_sys::File>),
    Uploaded(String, Result<Document, ApiError>),
    Delete(String),
    Deleted(Result<(), ApiError>),
}

pub struct Documents {
    list: Option<DocumentList>,
    loading: bool,
    uploading: usize,
    error: Option<String>,
    success: Option<String>,
    file_input_ref: NodeRef,
}

impl Component for Documents {
    type Message = Msg;
    type Properties = DocumentsProps;

    fn create(ctx: &Context<Self>) -> Self {
        ctx.link().send_message(Msg::Load);
        Self {
            list: None,
            loading: true,
            uploading: 0,
            error: None,
            success: None,
            file_input_ref: NodeRef::default(),
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Load => {
                self.loading = true;
                let client = ctx.props().client.clone();
                let link = ctx.link().clone();
                spawn_local(async move {
                    link.send_message(Msg::Loaded(client.documents().list().await));
                });
                true
            }
            Msg::Loaded(result) => {
                self.loading = false;
                match result {
                    Ok(list) => self.list = Some(list),
                    Err(err) => self.error = Some(err.message()),
                }
                true
            }
            Msg::OpenPicker => {
                if let Some(input) = self.file_input_ref.cast::<HtmlInputElement>() {
                    input.click();
                }
                false
            }
            Msg::FilesSelected(files) => {
                self.error = None;
                self.success = None;
                for file in files {
                    self.uploading += 1;
                    upload(ctx, file);
                }
                true
            }
            Msg::Uploaded(name, result) => {
                self.uploading = self.uploading.saturating_sub(1);
                match result {
                    Ok(_) => {
                        self.success = Some(format!("{name} uploaded successfully"));
                        ctx.link().send_message(Msg::Load);
                    }
                    Err(err) => self.error = Some(err.message()),
                }
                true
            }
            Msg::Delete(id) => {
                let confirmed = web_sys::window()
                    .and_then(|w| w.confirm_with_message("Are you sure you want to delete this document?").ok())
                    .unwrap_or(false);
                if !confirmed {
                    return false;
                }
                let client = ctx.props().client.clone();
                let link = ctx.link().clone();
                spawn_local(async move {
                    link.send_message(Msg::Deleted(client.documents().delete(&id).await));
                });
                false
            }
            Msg::Deleted(result) => {
                match result {
                    Ok(()) => {
                        show_toast("Document deleted");
                        ctx.link().send_message(Msg::Load);
                    }
                    Err(err) => self.error = Some(err.message()),
                }
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let accept = ALLOWED_EXTENSIONS
            .iter()
            .map(|ext| format!(".{ext}"))
            .collect::<Vec<_>>()
            .join(",");
        let onchange = link.callback(|event: Event| {
            let Some(input) = event
                .target()
                .and_then(|target| target.dyn_into::<HtmlInputElement>().ok())
            else {
                return Msg::FilesSelected(Vec::new());
            };
            let files: Vec<web_sys::File> = input
                .files()
                .map(|list| (0..list.length()).filter_map(|i| list.get(i)).collect())
                .unwrap_or_default();
            // Clearing lets the same file be picked again.
            input.set_value("");
            Msg::FilesSelected(files)
        });

        html! {
            <div class="page documents">
                <div class="page-header">
                    <div>
                        <h1>{"Documents"}</h1>
                        <p class="muted">{"Upload compliance documents for analysis"}</p>
                    </div>
                </div>

                { alert("alert-error", self.error.as_deref()) }
                { alert("alert-success", self.success.as_deref()) }

                <div class="card upload-zone" onclick={link.callback(|_| Msg::OpenPicker)}>
                    <input
                        type="file"
                        multiple=true
                        accept={accept}
                        style="display: none;"
                        ref={self.file_input_ref.clone()}
                        {onchange}
                    />
                    <i class="material-icons">{"upload"}</i>
                    <p>{ if self.uploading > 0 { "Uploading..." } else { "Click to upload" } }</p>
                    <p class="muted">{"Supports PDF, CSV, JSON, TXT and Markdown files up to 50MB"}</p>
                </div>

                <div class="card">
                    <h3>{ format!("Uploaded Documents ({})", self.list.as_ref().map_or(0, |l| l.total)) }</h3>
                    { self.document_list(ctx) }
                </div>
            </div>
        }
    }
}

impl Documents {
    fn document_list(&self, ctx: &Context<Self>) -> Html {
        match &self.list {
            None if self.loading => html! { <div class="spinner">{"Loading documents..."}</div> },
            Some(list) if !list.documents.is_empty() => html! {
                <ul class="divided">
                    { for list.documents.iter().map(|doc| document_row(ctx, doc)) }
                </ul>
            },
            _ => html! {
                <div class="empty-state">
                    <i class="material-icons muted">{"description"}</i>
                    <p>{"No documents uploaded yet"}</p>
                    <p class="muted">{"Upload your first document to get started"}</p>
                </div>
            },
        }
    }
}

fn document_row(ctx: &Context<Documents>, doc: &Document) -> Html {
    let icon = match doc.kind() {
        DocumentKind::Pdf => "picture_as_pdf",
        DocumentKind::Csv => "table_chart",
        DocumentKind::Json => "data_object",
        DocumentKind::Text | DocumentKind::Other => "description",
    };
    let id = doc.id.clone();
    html! {
        <li class="document-row" key={doc.id.clone()}>
            <i class="material-icons">{ icon }</i>
            <div>
                <p class="document-name">{ doc.display_name() }</p>
                <span class="badge">{ doc.file_type.to_uppercase() }</span>
                <span class="muted">{ format_bytes(doc.file_size) }</span>
                <span class="muted">{ format_optional_date(doc.uploaded_at.as_deref()) }</span>
            </div>
            <button class="icon-btn danger" title="Delete" onclick={ctx.link().callback(move |_| Msg::Delete(id.clone()))}>
                <i class="material-icons">{"delete"}</i>
            </button>
        </li>
    }
}

fn alert(class: &'static str, message: Option<&str>) -> Html {
    match message {
        Some(message) => html! { <div class={format!("alert {class}")}>{ message }</div> },
        None => html! {},
    }
}

/// Reads the picked file into memory and hands it to the upload endpoint.
fn upload(ctx: &Context<Documents>, file: web_sys::File) {
    let client = ctx.props().client.clone();
    let link = ctx.link().clone();
    spawn_local(async move {
        let name = file.name();
        let content_type = file.type_();
        let file = gloo_file::File::from(file);
        let result = match read_as_bytes(&file).await {
            Ok(bytes) => {
                client
                    .documents()
                    .upload(UploadFile::new(name.clone(), content_type, bytes))
                    .await
            }
            Err(err) => Err(ApiError::validation(format!("Could not read {name}: {err}"))),
        };
        link.send_message(Msg::Uploaded(name, result));
    });
}
