//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::{AppConfig, StoreKind};
use crate::error::{Error, Result};
use crate::likes::{FileStorage, LikeStore};
use crate::pagination::{PaginationState, Paginator};
use crate::post::{fetch_post, parse_post_path, PostMetadata};
use crate::store::{FirestoreStore, MemoryStore, PostStore};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let config = AppConfig::load(self.cli.config.as_deref())?;

        match &self.cli.command {
            Commands::Like { id } => self.like(&config, id, true).await,
            Commands::Unlike { id } => self.like(&config, id, false).await,
            Commands::Likes => self.likes(&config).await,
            Commands::Whoami => self.whoami(&config).await,
            _ => match config.store.kind {
                StoreKind::Memory => {
                    let store = MemoryStore::with_generated(config.store.seed_posts);
                    self.run_with_store(&config, Arc::new(store)).await
                }
                StoreKind::Firestore => {
                    let store =
                        FirestoreStore::new(config.firestore_config()?, config.media_resolver())?;
                    self.run_with_store(&config, Arc::new(store)).await
                }
            },
        }
    }

    async fn run_with_store<S: PostStore>(&self, config: &AppConfig, store: Arc<S>) -> Result<()> {
        match &self.cli.command {
            Commands::Feed { pages, page_size } => {
                let page_size = page_size.unwrap_or(config.feed.page_size);
                self.feed(config, store, *pages, page_size).await
            }
            Commands::Post { id } => self.post(store.as_ref(), id).await,
            Commands::All => self.all(store.as_ref()).await,
            _ => Ok(()),
        }
    }

    /// Walk the feed the way scrolling would
    async fn feed<S: PostStore>(
        &self,
        config: &AppConfig,
        store: Arc<S>,
        pages: Option<usize>,
        page_size: u32,
    ) -> Result<()> {
        if page_size == 0 {
            return Err(Error::invalid_value("page_size", "must be at least 1"));
        }

        let start = Instant::now();
        let paginator = Paginator::with_policy(store, page_size, config.feed.duplicate_policy);
        let max_pages = pages.unwrap_or(usize::MAX);

        let mut loaded = 0;
        let mut outcome = paginator.load_initial().await;
        loop {
            if outcome.is_loaded() {
                loaded += 1;
            }
            self.output_message(&json!({
                "type": "PAGE",
                "outcome": outcome,
                "state": paginator.state().await,
            }));

            if loaded >= max_pages || !paginator.trigger_enabled().await {
                break;
            }
            outcome = paginator.load_more().await;
        }

        let view = paginator.view().await;
        info!(
            "Loaded {} page(s), {} post(s) in {}ms",
            loaded,
            view.posts().len(),
            start.elapsed().as_millis()
        );
        self.output_message(&json!({
            "type": "FEED",
            "feed": view,
        }));

        match paginator.state().await {
            PaginationState::Failed { message, .. } => Err(Error::fetch_failed(message)),
            _ => Ok(()),
        }
    }

    /// Show a post's detail view
    async fn post<S: PostStore>(&self, store: &S, id: &str) -> Result<()> {
        let id = parse_post_path(id).unwrap_or(id);
        let result = fetch_post(store, id).await;
        let metadata = PostMetadata::from_outcome(&result);

        match result {
            Ok(post) => {
                self.output_message(&json!({
                    "type": "POST",
                    "post": post,
                    "metadata": metadata,
                }));
                Ok(())
            }
            Err(e) => {
                self.output_message(&json!({
                    "type": if e.is_not_found() { "NOT_FOUND" } else { "ERROR" },
                    "message": e.to_string(),
                    "metadata": metadata,
                }));
                Err(e)
            }
        }
    }

    /// Fetch every post in one call
    async fn all<S: PostStore>(&self, store: &S) -> Result<()> {
        let posts = store.fetch_all().await?;
        self.output_message(&json!({
            "type": "ALL",
            "count": posts.len(),
            "posts": posts,
        }));
        Ok(())
    }

    async fn like(&self, config: &AppConfig, id: &str, liked: bool) -> Result<()> {
        let likes = Self::like_store(config)?;
        let changed = if liked {
            likes.like(id).await?
        } else {
            likes.unlike(id).await?
        };

        self.output_message(&json!({
            "type": if liked { "LIKE" } else { "UNLIKE" },
            "post_id": id,
            "liked": likes.is_liked(id).await?,
            "changed": changed,
            "total_likes": likes.total_likes(id).await?,
        }));
        Ok(())
    }

    async fn likes(&self, config: &AppConfig) -> Result<()> {
        let likes = Self::like_store(config)?;
        self.output_message(&json!({
            "type": "LIKES",
            "posts": likes.liked_posts().await?,
            "counts": likes.like_counts().await?,
        }));
        Ok(())
    }

    async fn whoami(&self, config: &AppConfig) -> Result<()> {
        let likes = Self::like_store(config)?;
        self.output_message(&json!({
            "type": "WHOAMI",
            "anonymous_user_id": likes.anonymous_user_id().await?,
        }));
        Ok(())
    }

    fn like_store(config: &AppConfig) -> Result<LikeStore<FileStorage>> {
        Ok(LikeStore::new(config.open_storage()?))
    }

    /// Output a message
    fn output_message(&self, msg: &Value) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}
