//! Post management: a store-backed post service and the posts screen.
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

use mosaic_core::component::{Component, ComponentState, StatePatch, View};
use mosaic_core::kernel::error::Result as KernelResult;
use mosaic_core::ui_bridge::ListenerId;
use mosaic_core::{DependencyBundle, KernelError, KeyValueStore, Markup, Service, UiEvent};

pub const SERVICE: &str = "posts";
pub const COMPONENT: &str = "posts";
pub const MOUNT: &str = "posts-root";

/// Store key holding the serialized post list
const STORE_KEY: &str = "posts";

pub const SUBMIT_EVENT: &str = "submit";
pub const DELETE_EVENT: &str = "delete";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: u64,
    pub title: String,
    pub body: String,
}

/// Reads and writes posts as one JSON list in the key-value store
#[derive(Debug)]
pub struct PostService {
    store: Arc<dyn KeyValueStore>,
}

impl PostService {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn list(&self) -> KernelResult<Vec<Post>> {
        Ok(self.store.get_json::<Vec<Post>>(STORE_KEY)?.unwrap_or_default())
    }

    /// Add a post. The title must not be blank.
    pub fn create(&self, title: &str, body: &str) -> KernelResult<Post> {
        let title = title.trim();
        if title.is_empty() {
            return Err(KernelError::Other("a post needs a title".to_string()));
        }
        let mut posts = self.list()?;
        let post = Post {
            id: posts.iter().map(|p| p.id).max().unwrap_or(0) + 1,
            title: title.to_string(),
            body: body.trim().to_string(),
        };
        posts.push(post.clone());
        self.store.set_json(STORE_KEY, &posts)?;
        log::info!("Created post {} '{}'", post.id, post.title);
        Ok(post)
    }

    /// Remove a post by id. Returns whether it existed.
    pub fn delete(&self, id: u64) -> KernelResult<bool> {
        let mut posts = self.list()?;
        let before = posts.len();
        posts.retain(|p| p.id != id);
        if posts.len() == before {
            return Ok(false);
        }
        self.store.set_json(STORE_KEY, &posts)?;
        Ok(true)
    }
}

impl Service for PostService {
    fn name(&self) -> &'static str {
        "PostService"
    }
}

#[derive(Debug, Default)]
pub struct PostsComponent {
    posts: Option<Arc<PostService>>,
    listeners: Vec<ListenerId>,
}

impl PostsComponent {
    pub fn new() -> Self {
        Self::default()
    }

    fn snapshot(&self, error: Option<String>) -> StatePatch {
        let posts = match self.posts.as_ref().map(|s| s.list()) {
            Some(Ok(posts)) => posts,
            Some(Err(e)) => {
                log::warn!("Posts could not be read: {}", e);
                Vec::new()
            }
            None => Vec::new(),
        };
        StatePatch::new()
            .with("posts", json!(posts))
            .with("error", json!(error))
    }
}

#[async_trait]
impl Component for PostsComponent {
    fn mount_point(&self) -> &str {
        MOUNT
    }

    async fn on_init(&mut self, services: &DependencyBundle) -> KernelResult<StatePatch> {
        let posts = services.require::<PostService>(SERVICE)?;
        // Fail early on an unreadable store instead of rendering an empty list.
        posts.list()?;
        self.posts = Some(posts);
        Ok(self.snapshot(None))
    }

    fn render(&self, state: &ComponentState) -> Markup {
        let posts = state.get_as::<Vec<Post>>("posts").unwrap_or_default();
        let items: String = posts
            .iter()
            .map(|p| {
                format!(
                    "<article data-id=\"{}\"><h3>{}</h3><p>{}</p></article>",
                    p.id,
                    Markup::escape(&p.title),
                    Markup::escape(&p.body)
                )
            })
            .collect();
        let error = state
            .get_as::<String>("error")
            .map(|e| format!("<p class=\"error\">{}</p>", Markup::escape(&e)))
            .unwrap_or_default();
        Markup::new(format!("<section class=\"posts\">{}<form></form>{}</section>", error, items))
    }

    fn on_after_view_init(&mut self, view: &mut View<'_>) -> KernelResult<()> {
        self.listeners.push(view.listen(SUBMIT_EVENT)?);
        self.listeners.push(view.listen(DELETE_EVENT)?);
        Ok(())
    }

    fn handle_event(&mut self, event: &UiEvent, _state: &ComponentState) -> Option<StatePatch> {
        let service = self.posts.clone()?;
        let outcome = match event.kind.as_str() {
            SUBMIT_EVENT => {
                let title = event.payload.get("title").and_then(|v| v.as_str()).unwrap_or_default();
                let body = event.payload.get("body").and_then(|v| v.as_str()).unwrap_or_default();
                service.create(title, body).map(|_| ())
            }
            DELETE_EVENT => {
                let id = event.payload.get("id").and_then(|v| v.as_u64())?;
                service.delete(id).map(|_| ())
            }
            _ => return None,
        };
        Some(self.snapshot(outcome.err().map(|e| e.to_string())))
    }

    fn on_destroy(&mut self, view: &mut View<'_>) {
        for listener in self.listeners.drain(..) {
            view.unlisten(listener);
        }
    }
}
