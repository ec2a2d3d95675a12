//! Command line tool converting png masks into
//! signed distance field images, one file at a time
//! or over a whole folder.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{arg, value_parser};

use sdf_spread::prelude::*;
use sdf_spread::pixel::image_pipeline::to_gray16;


fn main() -> Result<()> {
    let matches = clap::command!()
        .arg(
            arg!(-i --input <PATH> "input image, or a folder of png images")
                .required(true)
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            arg!(-o --output <PATH> "output image, or a folder when the input is one")
                .required(true)
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            arg!(--spread <PIXELS> "maximum distance scanned for a nearby edge")
                .value_parser(value_parser!(f32))
                .default_value("4.0"),
        )
        .arg(
            arg!(--downscale <FACTOR> "factor by which the output image is downscaled")
                .value_parser(value_parser!(u32))
                .default_value("1"),
        )
        .arg(
            arg!(--channels <LIST> "channels defining the inside of the shape, e.g. 'r,a'")
                .default_value("a"),
        )
        .arg(
            arg!(--threshold <VALUE> "channel threshold for a pixel to count as inside")
                .value_parser(value_parser!(f32))
                .default_value("0.5"),
        )
        .arg(arg!(--crop "crop the mask to its occupied bounding box before rendering"))
        .arg(arg!(--overwrite "allow existing output files to be replaced"))
        .get_matches();

    let input = matches.get_one::<PathBuf>("input").unwrap();
    let output = matches.get_one::<PathBuf>("output").unwrap();
    let overwrite = matches.get_flag("overwrite");

    let settings = FieldSettings {
        spread: *matches.get_one::<f32>("spread").unwrap(),
        downscale: *matches.get_one::<u32>("downscale").unwrap(),
        channels: parse_channels(matches.get_one::<String>("channels").unwrap())?,
        threshold: *matches.get_one::<f32>("threshold").unwrap(),
        crop: matches.get_flag("crop"),
    };

    if settings.spread <= 0.0 {
        bail!("the 'spread' parameter has to be greater than zero");
    }
    if settings.downscale < 1 {
        bail!("the 'downscale' parameter has to be at least one");
    }
    if !(0.0..=1.0).contains(&settings.threshold) {
        bail!("the 'threshold' parameter has to lie within 0.0 and 1.0");
    }

    if input.is_dir() {
        if !output.is_dir() {
            bail!("when 'input' is a folder, 'output' must be a folder as well");
        }
        convert_folder(input, output, &settings, overwrite)
    }
    else {
        if output.is_dir() {
            bail!("when 'input' is a file, 'output' must be a file as well");
        }
        convert_file(input, output, &settings, overwrite)
    }
}

/// Parse a comma separated list of channel names into a selector.
fn parse_channels(list: &str) -> Result<ChannelSelector> {
    let mut channels = ChannelSelector::default();

    for name in list.split(',') {
        channels = match name.trim().to_lowercase().as_str() {
            "r" => channels.union(ChannelSelector::RED),
            "g" => channels.union(ChannelSelector::GREEN),
            "b" => channels.union(ChannelSelector::BLUE),
            "a" => channels.union(ChannelSelector::ALPHA),
            other => bail!(
                "'channels' can only contain the values r, g, b, a separated by commas, not '{}'",
                other
            ),
        };
    }

    Ok(channels)
}

/// Convert every png below the input folder,
/// writing the results flat into the output folder.
fn convert_folder(input: &Path, output: &Path, settings: &FieldSettings, overwrite: bool) -> Result<()> {
    for entry in fs::read_dir(input)
        .with_context(|| format!("while iterating the folder '{}'", input.display()))?
    {
        let path = entry?.path();

        if path.is_dir() {
            convert_folder(&path, output, settings, overwrite)?;
        }
        else if path.extension().map_or(false, |extension| extension == "png") {
            let file = path.file_name().expect("png path without a file name");
            convert_file(&path, &output.join(file), settings, overwrite)?;
        }
    }

    Ok(())
}

fn convert_file(input: &Path, output: &Path, settings: &FieldSettings, overwrite: bool) -> Result<()> {
    if output.exists() && !overwrite {
        bail!(
            "the destination file '{}' already exists, pass --overwrite to replace it",
            output.display()
        );
    }

    let source = image::open(input)
        .with_context(|| format!("while decoding '{}'", input.display()))?
        .to_rgba16();

    let field = generate_distance_field(&source, settings);

    to_gray16(&field)
        .save(output)
        .with_context(|| format!("while encoding '{}'", output.display()))?;

    println!("converted '{}' into '{}'", input.display(), output.display());
    Ok(())
}
