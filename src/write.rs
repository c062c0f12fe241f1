//! Writing frames out as single-extension FITS files.

use std::path::Path;

use fitsio::{
    images::{ImageDescription, ImageType},
    FitsFile,
};
use ndarray::ArrayView2;

use crate::{
    error::ObsError,
    header::{HeaderRecord, HeaderValue},
};

/// Write a 2-D frame and its header cards to `path` as a double-precision
/// primary image. Cards land in the header in record order, after the
/// structural keywords cfitsio maintains itself.
pub fn write_image(
    path: &Path,
    data: ArrayView2<f64>,
    header: &HeaderRecord,
    overwrite: bool,
) -> Result<(), ObsError> {
    let (height, width) = data.dim();
    let description = ImageDescription {
        data_type: ImageType::Double,
        dimensions: &[height, width],
    };

    let mut new_file = FitsFile::create(path).with_custom_primary(&description);
    if overwrite {
        new_file = new_file.overwrite();
    }
    let mut fptr = new_file.open()?;
    let hdu = fptr.primary_hdu()?;

    // The view may be non-contiguous; cfitsio wants one flat buffer.
    let pixels: Vec<f64> = data.iter().copied().collect();
    hdu.write_image(&mut fptr, &pixels)?;

    for (keyword, value) in header.iter() {
        match value {
            HeaderValue::Str(s) => hdu.write_key(&mut fptr, keyword, s.as_str())?,
            HeaderValue::Int(i) => hdu.write_key(&mut fptr, keyword, *i)?,
            HeaderValue::Float(f) => hdu.write_key(&mut fptr, keyword, *f)?,
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use ndarray::Array2;
    use tempfile::TempDir;

    #[test]
    fn frame_and_cards_survive_a_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("frame.fits");

        let data = Array2::from_shape_fn((3, 5), |(y, x)| (y * 5 + x) as f64);
        let mut header = HeaderRecord::new();
        header.set("TARGNAME", "flat");
        header.set("FRAMENUM", 7_i64);
        header.set("AIRMASS", 1.2);

        write_image(&path, data.view(), &header, false).unwrap();

        let mut fptr = FitsFile::open(&path).unwrap();
        let hdu = fptr.primary_hdu().unwrap();

        let targ: String = hdu.read_key(&mut fptr, "TARGNAME").unwrap();
        assert_eq!(targ, "flat");
        let fnum: i64 = hdu.read_key(&mut fptr, "FRAMENUM").unwrap();
        assert_eq!(fnum, 7);
        let airmass: f64 = hdu.read_key(&mut fptr, "AIRMASS").unwrap();
        assert!((airmass - 1.2).abs() < 1e-12);

        let pixels: Vec<f64> = hdu.read_image(&mut fptr).unwrap();
        assert_eq!(pixels.len(), 15);
        assert_eq!(pixels[0], 0.0);
        assert_eq!(pixels[14], 14.0);
    }

    #[test]
    fn overwrite_replaces_an_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("frame.fits");

        let first = Array2::zeros((2, 2));
        let second = Array2::from_elem((2, 2), 9.0);
        let header = HeaderRecord::new();

        write_image(&path, first.view(), &header, true).unwrap();
        write_image(&path, second.view(), &header, true).unwrap();

        let mut fptr = FitsFile::open(&path).unwrap();
        let hdu = fptr.primary_hdu().unwrap();
        let pixels: Vec<f64> = hdu.read_image(&mut fptr).unwrap();
        assert_eq!(pixels, vec![9.0; 4]);
    }
}
