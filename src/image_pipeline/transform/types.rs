//! Transform engine configuration types

/// Configuration for the parallel transform engine
#[derive(Debug, Clone)]
pub struct TransformOptions {
    /// Reuse the previous result when a pixel repeats the one scanned just before it
    pub memoize: bool,
    /// Rows per band; `None` derives it from the worker count
    pub band_height: Option<usize>,
    /// Dedicated worker count; `None` runs on the rayon global pool
    pub threads: Option<usize>,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            memoize: true,
            band_height: None,
            threads: None,
        }
    }
}

impl TransformOptions {
    pub fn builder() -> TransformOptionsBuilder {
        TransformOptionsBuilder::default()
    }
}

/// Builder for TransformOptions
#[derive(Default)]
pub struct TransformOptionsBuilder {
    memoize: Option<bool>,
    band_height: Option<Option<usize>>,
    threads: Option<Option<usize>>,
}

impl TransformOptionsBuilder {
    pub fn memoize(mut self, enable: bool) -> Self {
        self.memoize = Some(enable);
        self
    }

    pub fn band_height(mut self, rows: Option<usize>) -> Self {
        self.band_height = Some(rows);
        self
    }

    pub fn threads(mut self, threads: Option<usize>) -> Self {
        self.threads = Some(threads);
        self
    }

    pub fn build(self) -> TransformOptions {
        let default = TransformOptions::default();
        TransformOptions {
            memoize: self.memoize.unwrap_or(default.memoize),
            band_height: self.band_height.unwrap_or(default.band_height),
            threads: self.threads.unwrap_or(default.threads),
        }
    }
}
