//! Manifest-driven asset loading
//!
//! `load` starts a fetch and returns immediately. `poll` is called once per
//! frame; it finishes whatever fetches have completed, starts the image and
//! font fetches a manifest asks for, and reports completion exactly once.

use super::manifest::{asset_name, location_prefix, resolve, FontEntry, Manifest};
use super::{AssetStore, BitmapFont, SharedAssets};
use crate::canvas::ImageData;
use crate::draw::parse_group;
use crate::palette::Palette;
use crate::storage::{AsyncOp, FetchError, Fetcher};
use log::{error, info};
use std::rc::Rc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("could not fetch {location}: {source}")]
    Fetch {
        location: String,
        #[source]
        source: FetchError,
    },
    #[error("could not parse manifest {location}: {source}")]
    Manifest {
        location: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("could not decode {location}: {source}")]
    Decode {
        location: String,
        #[source]
        source: image::ImageError,
    },
}

enum Job {
    Manifest { location: String },
    Image { name: String, location: String },
    Font { name: String, location: String, entry: FontEntry },
}

impl Job {
    fn location(&self) -> &str {
        match self {
            Job::Manifest { location } | Job::Image { location, .. } | Job::Font { location, .. } => location,
        }
    }
}

struct Pending {
    job: Job,
    op: AsyncOp<Vec<u8>>,
}

pub struct AssetLoader {
    store: SharedAssets,
    fetcher: Rc<dyn Fetcher>,
    pending: Vec<Pending>,
    /// Images and fonts not yet in the store
    outstanding: usize,
    /// Manifests not yet parsed
    manifests: usize,
    started: bool,
    failures: Vec<LoaderError>,
    notified: bool,
}

impl AssetLoader {
    pub fn new(fetcher: Rc<dyn Fetcher>) -> Self {
        Self::with_store(AssetStore::new().shared(), fetcher)
    }

    pub fn with_store(store: SharedAssets, fetcher: Rc<dyn Fetcher>) -> Self {
        Self {
            store,
            fetcher,
            pending: Vec::new(),
            outstanding: 0,
            manifests: 0,
            started: false,
            failures: Vec::new(),
            notified: false,
        }
    }

    /// A second loader filling the same store. Assets it finds already
    /// cached are skipped.
    #[allow(dead_code)]
    pub fn fork(&self) -> Self {
        Self::with_store(self.store.clone(), self.fetcher.clone())
    }

    pub fn store(&self) -> SharedAssets {
        self.store.clone()
    }

    /// Start loading a manifest (path or URL)
    pub fn load(&mut self, location: &str) {
        info!("loading asset manifest {}", location);
        self.started = true;
        self.manifests += 1;
        self.start(Job::Manifest {
            location: location.to_string(),
        });
    }

    fn start(&mut self, job: Job) {
        let op = self.fetcher.fetch(job.location());
        self.pending.push(Pending { job, op });
    }

    /// Images and fonts still in flight
    pub fn outstanding(&self) -> usize {
        self.outstanding
    }

    pub fn failures(&self) -> &[LoaderError] {
        &self.failures
    }

    /// Everything requested so far has arrived and nothing failed
    pub fn is_loaded(&self) -> bool {
        self.started && self.manifests == 0 && self.outstanding == 0 && self.failures.is_empty()
    }

    /// Process finished fetches. Returns true on the single call where
    /// loading completes.
    pub fn poll(&mut self) -> bool {
        loop {
            let mut progressed = false;
            let mut idx = 0;
            while idx < self.pending.len() {
                if self.pending[idx].op.is_complete() {
                    let Pending { job, op } = self.pending.swap_remove(idx);
                    let result = op.take().unwrap_or(Err(FetchError::Disconnected));
                    self.finish(job, result);
                    progressed = true;
                } else {
                    idx += 1;
                }
            }
            if !progressed {
                break;
            }
        }

        if self.is_loaded() && !self.notified {
            self.notified = true;
            info!("all assets loaded");
            return true;
        }
        false
    }

    fn finish(&mut self, job: Job, result: Result<Vec<u8>, FetchError>) {
        let location = job.location().to_string();
        let outcome = result
            .map_err(|source| LoaderError::Fetch {
                location: location.clone(),
                source,
            })
            .and_then(|bytes| self.apply(job, &bytes));

        if let Err(e) = outcome {
            // the failed asset never completes, so loading stalls here
            error!("{}", e);
            self.failures.push(e);
        }
    }

    fn apply(&mut self, job: Job, bytes: &[u8]) -> Result<(), LoaderError> {
        match job {
            Job::Manifest { location } => {
                let manifest = Manifest::parse(bytes).map_err(|source| LoaderError::Manifest {
                    location: location.clone(),
                    source,
                })?;
                self.manifests -= 1;
                self.apply_manifest(&location, manifest);
            }
            Job::Image { name, location } => {
                let image = decode(&location, bytes)?;
                self.store.borrow_mut().insert_image(&name, image);
                self.outstanding -= 1;
            }
            Job::Font { name, location, entry } => {
                let strip = decode(&location, bytes)?;
                let font = BitmapFont::from_strip(&name, &strip, &entry.map, &entry.row_escapes);
                self.store.borrow_mut().insert_font(&name, font);
                self.outstanding -= 1;
            }
        }
        Ok(())
    }

    fn apply_manifest(&mut self, location: &str, manifest: Manifest) {
        let prefix = location_prefix(location).to_string();

        {
            let mut store = self.store.borrow_mut();
            for (name, roles) in manifest.palettes {
                let palette = Palette::from_hex_pairs(&name, roles.iter().map(|(r, h)| (r, h.as_str())));
                store.insert_palette(&name, palette);
            }
            for (name, items) in manifest.draw_groups {
                store.insert_draw_group(&name, parse_group(&items));
            }
        }

        for path in manifest.images {
            let name = asset_name(&path).to_string();
            if self.store.borrow().has_image(&name) {
                info!("skipping cached image {}", path);
                continue;
            }
            self.outstanding += 1;
            self.start(Job::Image {
                name,
                location: resolve(&prefix, &path),
            });
        }

        for entry in manifest.fonts {
            let name = asset_name(&entry.path).to_string();
            if self.store.borrow().has_font(&name) {
                info!("skipping cached font {}", entry.path);
                continue;
            }
            self.outstanding += 1;
            self.start(Job::Font {
                name,
                location: resolve(&prefix, &entry.path),
                entry,
            });
        }
    }
}

fn decode(location: &str, bytes: &[u8]) -> Result<ImageData, LoaderError> {
    ImageData::decode(bytes).map_err(|source| LoaderError::Decode {
        location: location.to_string(),
        source,
    })
}
