//! Per-kind REST clients.
//!
//! [`ClientFactory`] owns the HTTP client, the configuration and the shared
//! schema registry; [`EntityClient`] performs list/get/save/delete against
//! one kind's collection.

use std::path::Path;
use std::sync::Arc;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response, Url};
use serde_json::Value as Json;
use skyops_model::{Entity, SerializeOptions};
use skyops_schema::SchemaRegistry;
use skyops_types::{EntityId, EntityKind};
use tracing::{debug, info, warn};

use crate::config::{ClientConfig, Credentials};
use crate::error::{ClientError, ClientResult, parse_backend_messages};
use crate::query::{ListQuery, build_list_parameters};

/// Keys under which list envelopes carry their items, in lookup order.
const ITEM_KEYS: [&str; 3] = ["items", "data", "results"];

/// Where a save is. Reported by [`EntityClient::save_with_progress`].
///
/// A save starts idle and moves through `Validating`, then either stops at
/// `Invalid` or continues through `Serializing` and `InFlight` to
/// `Succeeded` or `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SavePhase {
    Validating,
    Invalid,
    Serializing,
    InFlight,
    Succeeded,
    Failed,
}

impl SavePhase {
    /// Returns true for phases that end a save.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SavePhase::Invalid | SavePhase::Succeeded | SavePhase::Failed
        )
    }
}

/// One page of a list response.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Page {
    pub items: Vec<Entity>,
    /// Total matching items on the backend, not just this page.
    pub count: u64,
}

/// Builds [`EntityClient`]s sharing one HTTP client and schema registry.
#[derive(Debug, Clone)]
pub struct ClientFactory {
    http: Client,
    config: Arc<ClientConfig>,
    credentials: Credentials,
    registry: Arc<SchemaRegistry>,
}

impl ClientFactory {
    pub fn new(
        config: ClientConfig,
        credentials: Credentials,
        registry: Arc<SchemaRegistry>,
    ) -> ClientResult<Self> {
        config.check()?;
        let http = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            http,
            config: Arc::new(config),
            credentials,
            registry,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<SchemaRegistry> {
        &self.registry
    }

    /// Client for `kind`'s collection. Embedded kinds have none.
    pub fn client(&self, kind: EntityKind) -> ClientResult<EntityClient> {
        Ok(EntityClient {
            kind,
            url: parse_url(&self.config.collection_url(kind)?)?,
            documents_url: parse_url(&self.config.collection_url(EntityKind::Document)?)?,
            http: self.http.clone(),
            credentials: self.credentials.clone(),
            registry: Arc::clone(&self.registry),
        })
    }

    /// Fetches the schema document from the backend and installs it for
    /// clients created afterwards.
    pub async fn fetch_registry(&mut self) -> ClientResult<Arc<SchemaRegistry>> {
        let url = self.config.schema_url();
        debug!("Fetching schema document from {}", url);

        let request = authorize(self.http.get(&url), &self.credentials);
        let document = read_json(request.send().await?).await?;
        let registry = SchemaRegistry::from_document(&document)?;

        info!("Loaded schemas for {} kind(s)", registry.kinds().count());
        Ok(self.install(registry))
    }

    /// Loads a schema document bundled on disk.
    pub async fn load_registry_file(
        &mut self,
        path: impl AsRef<Path>,
    ) -> ClientResult<Arc<SchemaRegistry>> {
        let path = path.as_ref();
        let text = tokio::fs::read_to_string(path).await.map_err(|e| {
            ClientError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        let registry = SchemaRegistry::from_json_str(&text)?;

        info!(
            "Loaded schemas for {} kind(s) from {}",
            registry.kinds().count(),
            path.display()
        );
        Ok(self.install(registry))
    }

    fn install(&mut self, registry: SchemaRegistry) -> Arc<SchemaRegistry> {
        self.registry = Arc::new(registry);
        Arc::clone(&self.registry)
    }
}

/// CRUD against one kind's collection.
#[derive(Debug, Clone)]
pub struct EntityClient {
    kind: EntityKind,
    url: Url,
    documents_url: Url,
    http: Client,
    credentials: Credentials,
    registry: Arc<SchemaRegistry>,
}

impl EntityClient {
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Collection URL.
    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    pub async fn list(&self, query: &ListQuery) -> ClientResult<Page> {
        let params = build_list_parameters(query);
        debug!("GET {} {:?}", self.url, params);

        let request = self.authorize(self.http.get(self.url.clone()).query(&params));
        let body = read_json(request.send().await?).await?;
        let (items, count) = split_envelope(body)?;

        let items: Vec<Entity> = items
            .iter()
            .map(|item| Entity::hydrate(self.kind, item, &self.registry))
            .collect();
        let count = count.unwrap_or(items.len() as u64);
        debug!("Listed {} {} of {}", items.len(), self.kind, count);

        Ok(Page { items, count })
    }

    pub async fn get(&self, id: &str) -> ClientResult<Entity> {
        let url = self.item_url(id);
        debug!("GET {}", url);

        let request = self.authorize(self.http.get(url));
        let body = read_json(request.send().await?).await?;
        self.hydrate_object(body)
    }

    /// Validates, serializes and sends `entity`.
    ///
    /// New entities are created with POST on the collection, persisted ones
    /// updated with PUT on their item URL. Nothing is sent when validation
    /// fails. Returns the entity as the backend now has it.
    pub async fn save(&self, entity: &Entity, options: &SerializeOptions) -> ClientResult<Entity> {
        self.save_with_progress(entity, options, |_| {}).await
    }

    /// [`save`](Self::save), reporting each phase to `on_phase`.
    pub async fn save_with_progress<F>(
        &self,
        entity: &Entity,
        options: &SerializeOptions,
        mut on_phase: F,
    ) -> ClientResult<Entity>
    where
        F: FnMut(SavePhase) + Send,
    {
        if entity.kind() != self.kind {
            return Err(ClientError::Config(format!(
                "cannot save a {} through the {} client",
                entity.kind(),
                self.kind
            )));
        }

        on_phase(SavePhase::Validating);
        let errors = entity.validate(&self.registry);
        if !errors.is_empty() {
            debug!("{} failed validation with {} error(s)", self.kind, errors.len());
            on_phase(SavePhase::Invalid);
            return Err(ClientError::Invalid(errors));
        }

        on_phase(SavePhase::Serializing);
        let body = match entity.as_backend_format(options) {
            Ok(body) => body,
            Err(e) => {
                on_phase(SavePhase::Failed);
                return Err(e.into());
            }
        };

        on_phase(SavePhase::InFlight);
        let result = self.send_write(entity, body).await;
        match &result {
            Ok(saved) => {
                info!("Saved {} {}", self.kind, saved.id());
                on_phase(SavePhase::Succeeded);
            }
            Err(e) => {
                warn!("Saving {} failed: {}", self.kind, e);
                on_phase(SavePhase::Failed);
            }
        }
        result
    }

    pub async fn delete(&self, id: &str) -> ClientResult<()> {
        let url = self.item_url(id);
        debug!("DELETE {}", url);

        let request = self.authorize(self.http.delete(url));
        read_json(request.send().await?).await?;
        info!("Deleted {} {}", self.kind, id);
        Ok(())
    }

    /// Uploads `document` and its pending file, attached to the persisted
    /// entity `owner`. Returns the stored document.
    pub async fn upload_document(
        &self,
        owner: &EntityId,
        document: &Entity,
    ) -> ClientResult<Entity> {
        let Some(owner_id) = owner.persisted_str() else {
            return Err(ClientError::Config(format!(
                "documents can only be attached to a persisted {}",
                self.kind
            )));
        };
        if document.kind() != EntityKind::Document {
            return Err(ClientError::Config(format!(
                "expected a document, got a {}",
                document.kind()
            )));
        }

        let mut document = document.clone();
        document.set("referenced_entity_id", owner_id)?;
        document.set("referenced_entity_type", self.kind.as_str())?;

        let errors = document.validate(&self.registry);
        if !errors.is_empty() {
            return Err(ClientError::Invalid(errors));
        }
        if document.pending_files().is_empty() {
            warn!("Uploading document for {} {} without a file", self.kind, owner_id);
        }

        let body = document.as_backend_format(&SerializeOptions::default())?;
        let form = multipart_form(&document, &body)?;
        debug!("POST {} (multipart)", self.documents_url);

        let request = self.authorize(self.http.post(self.documents_url.clone()).multipart(form));
        let saved = read_json(request.send().await?).await?;
        let saved = hydrate_object(EntityKind::Document, saved, &self.registry)?;
        info!("Uploaded document {} for {} {}", saved.id(), self.kind, owner_id);
        Ok(saved)
    }

    async fn send_write(&self, entity: &Entity, body: Json) -> ClientResult<Entity> {
        let request = match entity.id() {
            EntityId::New => {
                debug!("POST {}", self.url);
                self.http.post(self.url.clone())
            }
            EntityId::Persisted(id) => {
                let url = self.item_url(id);
                debug!("PUT {}", url);
                self.http.put(url)
            }
        };

        let request = if entity.pending_files().is_empty() {
            request.json(&body)
        } else {
            request.multipart(multipart_form(entity, &body)?)
        };

        let response = read_json(self.authorize(request).send().await?).await?;
        self.hydrate_object(response)
    }

    /// Item URL with `id` percent-encoded as a single path segment.
    fn item_url(&self, id: &str) -> Url {
        let mut url = self.url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(id);
        }
        url
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        authorize(request, &self.credentials)
    }

    fn hydrate_object(&self, body: Json) -> ClientResult<Entity> {
        hydrate_object(self.kind, body, &self.registry)
    }
}

fn parse_url(url: &str) -> ClientResult<Url> {
    Url::parse(url).map_err(|e| ClientError::Config(format!("invalid URL {url:?}: {e}")))
}

fn authorize(request: RequestBuilder, credentials: &Credentials) -> RequestBuilder {
    match credentials.token() {
        Some(token) => request.bearer_auth(token),
        None => request,
    }
}

/// Reads a response body as JSON, turning non-success statuses into
/// [`ClientError::Backend`]. An empty body reads as `null`.
async fn read_json(response: Response) -> ClientResult<Json> {
    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
        let messages = parse_backend_messages(&text);
        warn!("Backend rejected request ({}): {:?}", status, messages);
        return Err(ClientError::Backend {
            status: status.as_u16(),
            messages,
        });
    }

    if text.trim().is_empty() {
        return Ok(Json::Null);
    }
    Ok(serde_json::from_str(&text)?)
}

fn hydrate_object(kind: EntityKind, body: Json, registry: &SchemaRegistry) -> ClientResult<Entity> {
    if !body.is_object() {
        return Err(ClientError::UnexpectedResponse(format!(
            "expected a {kind} object, got {body}"
        )));
    }
    Ok(Entity::hydrate(kind, &body, registry))
}

/// Splits a list response into its items and the backend's total count.
fn split_envelope(body: Json) -> ClientResult<(Vec<Json>, Option<u64>)> {
    match body {
        Json::Array(items) => Ok((items, None)),
        Json::Object(mut object) => {
            let count = object
                .get("count")
                .or_else(|| object.get("total"))
                .and_then(Json::as_u64);
            let key = ITEM_KEYS
                .iter()
                .map(|k| k.to_string())
                .find(|k| object.get(k).is_some_and(Json::is_array))
                .or_else(|| {
                    object
                        .iter()
                        .find(|(_, v)| v.is_array())
                        .map(|(k, _)| k.clone())
                });
            match key.and_then(|k| object.remove(&k)) {
                Some(Json::Array(items)) => Ok((items, count)),
                _ => Err(ClientError::UnexpectedResponse(
                    "list response has no item array".into(),
                )),
            }
        }
        other => Err(ClientError::UnexpectedResponse(format!(
            "expected a list, got {other}"
        ))),
    }
}

/// Multipart form carrying the serialized fields as text parts plus one file
/// part per pending file.
fn multipart_form(entity: &Entity, body: &Json) -> ClientResult<Form> {
    let mut form = Form::new();

    if let Some(object) = body.as_object() {
        for (key, value) in object {
            let text = match value {
                Json::Null => continue,
                Json::String(s) => s.clone(),
                other => other.to_string(),
            };
            form = form.text(key.clone(), text);
        }
    }

    for (field, file) in entity.pending_files() {
        let mut part = Part::bytes(file.bytes.clone()).file_name(file.file_name.clone());
        if let Some(content_type) = &file.content_type {
            part = part.mime_str(content_type)?;
        }
        form = form.part(field.to_string(), part);
    }

    Ok(form)
}
