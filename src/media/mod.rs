//! Asset loading: bitmap files → mipmapped [`Texture`]s.

pub mod bmp;

use std::path::{Path, PathBuf};

use log::{info, warn};
use thiserror::Error;

use crate::world::texture::{Image, Texture};

pub use bmp::BmpError;

#[derive(Error, Debug)]
pub enum MediaError {
    #[error("failed to decode `{path}`: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: BmpError,
    },

    /// Mipmap chains need both dimensions divisible by 8.
    #[error("texture `{path}` is {width}x{height}; both sides must be multiples of 8")]
    TextureSize {
        path: PathBuf,
        width: usize,
        height: usize,
    },
}

/// Decode `path` and build its mipmap chain.
pub fn load_texture<P: AsRef<Path>>(path: P) -> Result<Texture, MediaError> {
    let path = path.as_ref();
    let image = bmp::load(path).map_err(|source| MediaError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    let texture = texture_from_image(path, image)?;
    info!("loaded texture {} ({}x{})", path.display(), texture.width, texture.height);
    Ok(texture)
}

fn texture_from_image(path: &Path, image: Image) -> Result<Texture, MediaError> {
    if image.width % 8 != 0 || image.height % 8 != 0 {
        warn!("rejecting {}: {}x{} cannot be mipmapped", path.display(), image.width, image.height);
        return Err(MediaError::TextureSize {
            path: path.to_path_buf(),
            width: image.width,
            height: image.height,
        });
    }
    Ok(Texture::new(image))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_bmp(w: usize, h: usize) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let rgb = vec![[200, 100, 50]; w * h];
        file.write_all(&bmp::encode_rgb24(w, h, &rgb)).unwrap();
        file
    }

    #[test]
    fn builds_mipmaps_for_valid_sizes() {
        let file = write_bmp(16, 8);
        let tex = load_texture(file.path()).unwrap();
        assert_eq!(tex.levels().len(), 4);
        assert_eq!((tex.mipmap(3).width, tex.mipmap(3).height), (2, 1));
    }

    #[test]
    fn rejects_sizes_that_cannot_be_mipmapped() {
        let file = write_bmp(12, 8);
        let err = load_texture(file.path()).unwrap_err();
        assert!(matches!(err, MediaError::TextureSize { width: 12, height: 8, .. }));
    }

    #[test]
    fn decode_errors_carry_the_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"GIF89a, definitely not a bitmap").unwrap();
        let err = load_texture(file.path()).unwrap_err();
        match err {
            MediaError::Decode { path, source } => {
                assert_eq!(path, file.path());
                assert!(matches!(source, BmpError::BadMagic));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }
}
