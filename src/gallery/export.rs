//! Static HTML export of a gallery directory

use std::fs;
use std::path::{Path, PathBuf};
use maud::{html, Markup, PreEscaped, DOCTYPE};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use tracing::info;

use crate::config::{GalleryConfig, BIG, SMALL, THUMB_DIR_NAME};
use crate::error::{Result, ErrorContext};

const STYLESHEET: &str = include_str!("../../assets/gallery.css");
const PREVIEW_SCRIPT: &str = include_str!("../../assets/gallery.js");

/// Everything outside the URL unreserved set gets percent-encoded
const FILE_NAME: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Directory the stylesheet is copied into
pub const PUBLIC_DIR_NAME: &str = "public";

/// Writes `index.html` and its assets next to the images
pub struct StaticExporter {
    title: String,
}

/// Files produced by an export
#[derive(Debug, Clone)]
pub struct ExportedFiles {
    pub index: PathBuf,
    pub stylesheet: PathBuf,
}

impl StaticExporter {
    pub fn new(config: &GalleryConfig) -> Self {
        Self {
            title: config.title.clone(),
        }
    }

    /// Export a page listing `images`, which must already exclude failed ones
    pub fn export(&self, dir: &Path, images: &[String]) -> Result<ExportedFiles> {
        let index = dir.join("index.html");
        fs::write(&index, render_index(&self.title, images)).with_file_context(index.clone())?;

        let public = dir.join(PUBLIC_DIR_NAME);
        fs::create_dir_all(&public).with_file_context(public.clone())?;

        let stylesheet = public.join("gallery.css");
        fs::write(&stylesheet, STYLESHEET).with_file_context(stylesheet.clone())?;

        info!("Exported gallery of {} images to {:?}", images.len(), index);

        Ok(ExportedFiles { index, stylesheet })
    }
}

/// Render the index page for `images`
pub fn render_index(title: &str, images: &[String]) -> String {
    index_page(title, images).into_string()
}

fn index_page(title: &str, images: &[String]) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                link rel="stylesheet" href="public/gallery.css";
            }
            body {
                h1 { (title) }
                main class="gallery" {
                    @for image in images {
                        a class="photo"
                            href=(escape_url(image))
                            data-big=(thumbnail_url(&BIG.artifact_name(image))) {
                            img src=(thumbnail_url(&SMALL.artifact_name(image)))
                                alt=(image)
                                loading="lazy";
                        }
                    }
                }
                div class="preview" hidden { img alt=""; }
                script { (PreEscaped(PREVIEW_SCRIPT)) }
            }
        }
    }
}

fn thumbnail_url(artifact_name: &str) -> String {
    format!("{}/{}", THUMB_DIR_NAME, escape_url(artifact_name))
}

fn escape_url(name: &str) -> String {
    utf8_percent_encode(name, FILE_NAME).to_string()
}
