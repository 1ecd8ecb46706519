//! Image collection enumeration and extent scanning.
//!
//! The extent scan is an explicit first pass over the collection headers;
//! the discovered maximum is passed as a parameter into the per-image
//! operations rather than kept as shared mutable state.

use std::path::{Path, PathBuf};

use airphoto_image::ImageSize;
use airphoto_io::functional::read_image_size;

use crate::error::PipelineError;

/// The minimum and maximum image dimensions discovered in a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionExtent {
    /// Largest width found, in pixels.
    pub max_width: usize,
    /// Largest height found, in pixels.
    pub max_height: usize,
    /// Smallest width found, in pixels.
    pub min_width: usize,
    /// Smallest height found, in pixels.
    pub min_height: usize,
}

impl CollectionExtent {
    /// The maximum size, used as the standardized canvas.
    pub fn max_size(&self) -> ImageSize {
        ImageSize {
            width: self.max_width,
            height: self.max_height,
        }
    }

    /// Whether every image in the collection has the same size.
    pub fn is_uniform(&self) -> bool {
        self.max_width == self.min_width && self.max_height == self.min_height
    }
}

/// A directory of raster images sharing one file format.
pub struct ImageCollection {
    root: PathBuf,
    extension: String,
    images: Vec<PathBuf>,
}

impl ImageCollection {
    /// Enumerate the images with the given extension in `root`.
    ///
    /// The listing is sorted by filename so reports and batch logs are
    /// reproducible across runs.
    ///
    /// # Errors
    ///
    /// [`PipelineError::EmptyCollection`] when no file matches the filter.
    pub fn discover(root: impl AsRef<Path>, extension: &str) -> Result<Self, PipelineError> {
        let root = root.as_ref();
        let mut images = Vec::new();

        for entry in std::fs::read_dir(root).map_err(airphoto_io::IoError::from)? {
            let entry = entry.map_err(airphoto_io::IoError::from)?;
            let path = entry.path();
            if path.is_file()
                && path
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
            {
                images.push(path);
            }
        }
        images.sort();

        if images.is_empty() {
            return Err(PipelineError::EmptyCollection {
                directory: root.to_path_buf(),
                extension: extension.to_owned(),
            });
        }

        log::info!(
            "found {} '{}' images in {:?}",
            images.len(),
            extension,
            root
        );

        Ok(Self {
            root: root.to_path_buf(),
            extension: extension.to_owned(),
            images,
        })
    }

    /// The enumerated image paths, sorted by filename.
    pub fn images(&self) -> &[PathBuf] {
        &self.images
    }

    /// The number of images in the collection.
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Whether the collection holds no images.
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Scan every image header and return the collection extent.
    ///
    /// Only headers are read; pixel data is not decoded.
    pub fn scan_extent(&self) -> Result<CollectionExtent, PipelineError> {
        let mut extent: Option<CollectionExtent> = None;

        for path in &self.images {
            let size = read_image_size(path)?;
            extent = Some(match extent {
                None => CollectionExtent {
                    max_width: size.width,
                    max_height: size.height,
                    min_width: size.width,
                    min_height: size.height,
                },
                Some(e) => CollectionExtent {
                    max_width: e.max_width.max(size.width),
                    max_height: e.max_height.max(size.height),
                    min_width: e.min_width.min(size.width),
                    min_height: e.min_height.min(size.height),
                },
            });
        }

        extent.ok_or_else(|| PipelineError::EmptyCollection {
            directory: self.root.clone(),
            extension: self.extension.clone(),
        })
    }
}

/// The identifier of an image: its filename with the extension stripped.
pub fn image_id(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use airphoto_image::Image;
    use airphoto_io::png::write_image_png_gray8;

    fn write_blank_png(dir: &Path, name: &str, width: usize, height: usize) {
        let image = Image::<u8, 1>::from_size_val(ImageSize { width, height }, 0).unwrap();
        write_image_png_gray8(dir.join(name), &image).unwrap();
    }

    #[test]
    fn discover_filters_and_sorts() -> Result<(), PipelineError> {
        let dir = tempfile::tempdir().unwrap();
        write_blank_png(dir.path(), "b.png", 10, 10);
        write_blank_png(dir.path(), "a.png", 10, 10);
        std::fs::write(dir.path().join("notes.txt"), b"ignored").unwrap();

        let collection = ImageCollection::discover(dir.path(), "png")?;
        assert_eq!(collection.len(), 2);
        assert_eq!(image_id(&collection.images()[0]), "a");
        assert_eq!(image_id(&collection.images()[1]), "b");
        Ok(())
    }

    #[test]
    fn discover_empty_collection_fails() {
        let dir = tempfile::tempdir().unwrap();
        let res = ImageCollection::discover(dir.path(), "tif");
        assert!(matches!(res, Err(PipelineError::EmptyCollection { .. })));
    }

    #[test]
    fn extent_tracks_min_and_max() -> Result<(), PipelineError> {
        let dir = tempfile::tempdir().unwrap();
        write_blank_png(dir.path(), "one.png", 100, 80);
        write_blank_png(dir.path(), "two.png", 120, 90);
        write_blank_png(dir.path(), "three.png", 90, 100);

        let collection = ImageCollection::discover(dir.path(), "png")?;
        let extent = collection.scan_extent()?;

        assert_eq!(extent.max_width, 120);
        assert_eq!(extent.max_height, 100);
        assert_eq!(extent.min_width, 90);
        assert_eq!(extent.min_height, 80);
        assert!(!extent.is_uniform());
        Ok(())
    }

    #[test]
    fn uniform_extent() -> Result<(), PipelineError> {
        let dir = tempfile::tempdir().unwrap();
        write_blank_png(dir.path(), "one.png", 64, 64);
        write_blank_png(dir.path(), "two.png", 64, 64);

        let extent = ImageCollection::discover(dir.path(), "png")?.scan_extent()?;
        assert!(extent.is_uniform());
        assert_eq!(
            extent.max_size(),
            ImageSize {
                width: 64,
                height: 64
            }
        );
        Ok(())
    }
}
