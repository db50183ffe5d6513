// Remote image loading for grid tiles and the detail page
// Worker threads download and decode; textures are built and cached on the UI thread

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::num::NonZeroUsize;
use std::rc::Rc;
use std::time::Duration;

use anyhow::{Context, Result};
use gdk4::Texture;
use gtk4::prelude::*;
use gtk4::{gdk, glib, Picture};
use lru::LruCache;
use ureq::Agent;

const LOADER_THREADS: usize = 4;
const LOADER_QUEUE: usize = 512;
const CACHE_ENTRIES: usize = 512;
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// Longest edge of decoded grid thumbnails.
pub const THUMBNAIL_EDGE: u32 = 400;
/// Longest edge of decoded detail images.
pub const FULL_EDGE: u32 = 1600;

struct LoadRequest {
    url: String,
    max_edge: u32,
}

struct LoadResult {
    key: String,
    rgba: Option<(Vec<u8>, u32, u32)>,
}

struct LoaderState {
    pending: HashSet<String>,
    waiters: HashMap<String, Vec<glib::WeakRef<Picture>>>,
    cache: LruCache<String, Texture>,
}

struct ImageLoader {
    request_tx: flume::Sender<LoadRequest>,
    state: RefCell<LoaderState>,
}

thread_local! {
    static IMAGE_LOADER: Rc<ImageLoader> = ImageLoader::new();
}

/// Show the image at `url` in `picture` once it is available.
pub fn load_into(picture: &Picture, url: &str, max_edge: u32) {
    IMAGE_LOADER.with(|loader| loader.request(picture, url, max_edge));
}

fn cache_key(url: &str, max_edge: u32) -> String {
    format!("{max_edge}:{url}")
}

impl ImageLoader {
    fn new() -> Rc<Self> {
        let (request_tx, request_rx) = flume::bounded::<LoadRequest>(LOADER_QUEUE);
        let (result_tx, result_rx) = async_channel::unbounded::<LoadResult>();

        for _ in 0..LOADER_THREADS {
            let rx = request_rx.clone();
            let tx = result_tx.clone();
            std::thread::spawn(move || {
                let agent: Agent = Agent::config_builder()
                    .timeout_global(Some(DOWNLOAD_TIMEOUT))
                    .build()
                    .into();
                while let Ok(req) = rx.recv() {
                    let rgba = match download_and_decode(&agent, &req.url, req.max_edge) {
                        Ok(decoded) => Some(decoded),
                        Err(err) => {
                            tracing::warn!(url = %req.url, error = ?err, "Image load failed");
                            None
                        }
                    };
                    let key = cache_key(&req.url, req.max_edge);
                    if tx.send_blocking(LoadResult { key, rgba }).is_err() {
                        break;
                    }
                }
            });
        }

        let loader = Rc::new(Self {
            request_tx,
            state: RefCell::new(LoaderState {
                pending: HashSet::new(),
                waiters: HashMap::new(),
                cache: LruCache::new(NonZeroUsize::new(CACHE_ENTRIES).unwrap_or(NonZeroUsize::MIN)),
            }),
        });

        let loader_weak = Rc::downgrade(&loader);
        glib::spawn_future_local(async move {
            while let Ok(result) = result_rx.recv().await {
                match loader_weak.upgrade() {
                    Some(loader) => loader.apply_result(result),
                    None => break,
                }
            }
        });

        loader
    }

    fn request(&self, picture: &Picture, url: &str, max_edge: u32) {
        let key = cache_key(url, max_edge);
        let mut state = self.state.borrow_mut();

        if let Some(texture) = state.cache.get(&key) {
            picture.set_paintable(Some(texture));
            return;
        }

        state
            .waiters
            .entry(key.clone())
            .or_default()
            .push(picture.downgrade());

        if state.pending.insert(key.clone()) {
            let request = LoadRequest {
                url: url.to_string(),
                max_edge,
            };
            if self.request_tx.try_send(request).is_err() {
                tracing::debug!(url, "Image queue full, dropping request");
                state.pending.remove(&key);
                state.waiters.remove(&key);
            }
        }
    }

    fn apply_result(&self, result: LoadResult) {
        let texture = result
            .rgba
            .and_then(|(rgba, width, height)| create_texture_from_rgba(rgba, width, height));

        let waiters = {
            let mut state = self.state.borrow_mut();
            state.pending.remove(&result.key);
            if let Some(ref texture) = texture {
                state.cache.put(result.key.clone(), texture.clone());
            }
            state.waiters.remove(&result.key).unwrap_or_default()
        };

        let Some(texture) = texture else {
            return;
        };
        for waiter in waiters {
            if let Some(picture) = waiter.upgrade() {
                picture.set_paintable(Some(&texture));
            }
        }
    }
}

fn download_and_decode(agent: &Agent, url: &str, max_edge: u32) -> Result<(Vec<u8>, u32, u32)> {
    let mut response = agent
        .get(url)
        .call()
        .with_context(|| format!("Failed to download {url}"))?;
    let bytes = response
        .body_mut()
        .read_to_vec()
        .with_context(|| format!("Failed to read body of {url}"))?;
    let img = image::load_from_memory(&bytes)
        .with_context(|| format!("Failed to decode image from {url}"))?;
    let resized = img.thumbnail(max_edge, max_edge);
    let (width, height) = (resized.width(), resized.height());
    Ok((resized.to_rgba8().into_raw(), width.max(1), height.max(1)))
}

fn create_texture_from_rgba(rgba: Vec<u8>, width: u32, height: u32) -> Option<Texture> {
    if width == 0 || height == 0 {
        return None;
    }
    let expected = (width as usize)
        .saturating_mul(height as usize)
        .saturating_mul(4);
    if rgba.len() < expected {
        return None;
    }
    let bytes = glib::Bytes::from_owned(rgba);
    let texture = gdk::MemoryTexture::new(
        width as i32,
        height as i32,
        gdk::MemoryFormat::R8g8b8a8,
        &bytes,
        (width * 4) as usize,
    );
    Some(texture.upcast())
}
