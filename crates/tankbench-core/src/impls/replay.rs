//! ReplayFrameSource - 保存済みスクリーンショットの再生
//!
//! ディレクトリ内の画像（png / jpg / jpeg）をファイル名順に 1 枚ずつ返します。
//! デコードはブロッキング処理なので spawn_blocking で実行します。

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::domain::Frame;
use crate::ports::{CaptureError, Clock, FrameSource};

const EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

pub struct ReplayFrameSource<C> {
    pending: VecDeque<PathBuf>,
    clock: C,
    next_seq: u64,
}

impl<C: Clock> ReplayFrameSource<C> {
    /// 画像ファイルを列挙してソートする（中身はまだ読まない）
    pub fn from_dir(dir: impl AsRef<Path>, clock: C) -> Result<Self, CaptureError> {
        let dir = dir.as_ref();
        let read_err = |e: std::io::Error| CaptureError::Read {
            path: dir.display().to_string(),
            message: e.to_string(),
        };

        let mut paths = Vec::new();
        for entry in std::fs::read_dir(dir).map_err(read_err)? {
            let path = entry.map_err(read_err)?.path();
            let is_image = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()));
            if is_image {
                paths.push(path);
            }
        }
        paths.sort();

        tracing::info!(dir = %dir.display(), frames = paths.len(), "replay source ready");
        Ok(Self::from_paths(paths, clock))
    }

    pub fn from_paths(paths: Vec<PathBuf>, clock: C) -> Self {
        Self {
            pending: paths.into(),
            clock,
            next_seq: 0,
        }
    }

    pub fn remaining(&self) -> usize {
        self.pending.len()
    }
}

/// Decode one image file into an RGB frame buffer.
pub async fn load_image(path: PathBuf) -> Result<image::RgbImage, CaptureError> {
    let display = path.display().to_string();
    tokio::task::spawn_blocking(move || image::open(&path).map(|img| img.to_rgb8()))
        .await
        .map_err(|e| CaptureError::Other(format!("decode task failed: {e}")))?
        .map_err(|e| CaptureError::Read {
            path: display,
            message: e.to_string(),
        })
}

#[async_trait]
impl<C: Clock> FrameSource for ReplayFrameSource<C> {
    async fn capture(&mut self) -> Result<Frame, CaptureError> {
        let path = self.pending.pop_front().ok_or(CaptureError::Exhausted)?;
        tracing::debug!(path = %path.display(), seq = self.next_seq, "replaying frame");

        let image = load_image(path).await?;
        let frame = Frame::new(self.next_seq, self.clock.now(), image);
        self.next_seq += 1;
        Ok(frame)
    }
}
