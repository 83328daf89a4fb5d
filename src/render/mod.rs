use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("template '{0}' not found")]
    NotFound(String),

    #[error("failed to read template '{name}': {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

/// Page templates with `{{key}}` slots, loaded from a directory. Files are
/// re-read on every request when caching is off (development) and cached
/// after the first read otherwise. Constructed once at startup and injected;
/// there is no process-global template state.
pub struct TemplateCache {
    dir: PathBuf,
    cache_enabled: bool,
    cache: RwLock<HashMap<String, String>>,
}

impl TemplateCache {
    pub fn new(dir: impl Into<PathBuf>, cache_enabled: bool) -> Self {
        Self {
            dir: dir.into(),
            cache_enabled,
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn render(&self, page: &str, data: &[(&str, String)]) -> Result<String, RenderError> {
        let mut html = self.load(page)?;
        for (key, value) in data {
            html = html.replace(&format!("{{{{{}}}}}", key), value);
        }
        Ok(html)
    }

    fn load(&self, page: &str) -> Result<String, RenderError> {
        if self.cache_enabled {
            let cache = self.cache.read().expect("template cache poisoned");
            if let Some(hit) = cache.get(page) {
                return Ok(hit.clone());
            }
        }

        let path = self.dir.join(format!("{}.html", page));
        let source = std::fs::read_to_string(&path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                RenderError::NotFound(page.to_string())
            } else {
                RenderError::Io {
                    name: page.to_string(),
                    source,
                }
            }
        })?;

        if self.cache_enabled {
            self.cache
                .write()
                .expect("template cache poisoned")
                .insert(page.to_string(), source.clone());
        }
        Ok(source)
    }
}
