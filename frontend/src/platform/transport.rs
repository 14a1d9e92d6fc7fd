use common::requests::UploadFile;
use common::{ApiError, HttpRequest, HttpResponse, Method, RequestBody, ResponseKind, Transport};
use gloo_net::http::Request;
use wasm_bindgen::JsValue;
use web_sys::{FormData, UrlSearchParams};

/// `fetch` through `gloo-net`. Any response, whatever its status, is handed
/// back; only a failed round trip is an error. Successful downloads are read
/// as bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchTransport;

impl Transport for FetchTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let mut builder = match request.method {
            Method::Get => Request::get(&request.url),
            Method::Post => Request::post(&request.url),
            Method::Delete => Request::delete(&request.url),
        };
        if let Some(token) = &request.bearer {
            builder = builder.header("Authorization", &format!("Bearer {token}"));
        }

        let prepared = match request.body {
            RequestBody::Empty => builder.build(),
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Form(fields) => builder.body(form_body(&fields)?),
            RequestBody::Multipart { field, file } => builder.body(multipart_body(&field, &file)?),
        }
        .map_err(|err| ApiError::Network(err.to_string()))?;

        let response = prepared
            .send()
            .await
            .map_err(|err| ApiError::Network(err.to_string()))?;
        let status = response.status();
        if request.expect == ResponseKind::Binary && response.ok() {
            let bytes = response
                .binary()
                .await
                .map_err(|err| ApiError::Network(err.to_string()))?;
            return Ok(HttpResponse::binary(status, bytes));
        }
        let body = response.text().await.unwrap_or_default();
        Ok(HttpResponse::new(status, body))
    }
}

fn js_error(what: &str) -> impl Fn(JsValue) -> ApiError + '_ {
    move |_| ApiError::Network(format!("Could not prepare {what}"))
}

fn form_body(fields: &[(String, String)]) -> Result<UrlSearchParams, ApiError> {
    let params = UrlSearchParams::new().map_err(js_error("form"))?;
    for (name, value) in fields {
        params.append(name, value);
    }
    Ok(params)
}

fn multipart_body(field: &str, file: &UploadFile) -> Result<FormData, ApiError> {
    let form = FormData::new().map_err(js_error("upload"))?;
    let mime = Some(file.content_type.as_str()).filter(|mime| !mime.is_empty());
    let blob = gloo_file::Blob::new_with_options(file.bytes.as_slice(), mime);
    let blob: web_sys::Blob = blob.into();
    form.append_with_blob_and_filename(field, &blob, &file.file_name)
        .map_err(js_error("upload"))?;
    Ok(form)
}
