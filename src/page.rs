//! Page Assembly
//!
//! Builds a complete page: fetch the shell, load every component into it,
//! then render profile tokens. Only a missing shell is fatal; component
//! failures end up in the returned [`LoadReport`].

use chrono::NaiveDate;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::components::{
    ComponentAssembler, ComponentEvent, ComponentRegistry, FetchError, FragmentSource,
    HtmlDocument, LoadReport,
};
use crate::profile::{interpolate, Profile};

/// Errors that prevent a page from being assembled at all
#[derive(Error, Debug)]
pub enum PageError {
    /// The page shell could not be retrieved
    #[error("Failed to load page shell {path}: {source}")]
    Shell {
        path: String,
        #[source]
        source: FetchError,
    },
}

/// A fully assembled page
#[derive(Debug, Clone)]
pub struct AssembledPage {
    pub html: String,
    pub report: LoadReport,
}

/// Inputs for one page session
pub struct PageRequest<'a> {
    /// Path of the shell document within the source
    pub shell_path: &'a str,
    pub registry: ComponentRegistry,
    pub profile: Option<&'a Profile>,
    pub today: NaiveDate,
}

/// Assemble a page from its shell and registered components
pub async fn assemble_page<S>(request: PageRequest<'_>, source: S) -> Result<AssembledPage, PageError>
where
    S: FragmentSource,
{
    assemble_inner(request, source, None).await
}

/// Like [`assemble_page`], forwarding component events to `events`
pub async fn assemble_page_notifying<S>(
    request: PageRequest<'_>,
    source: S,
    events: mpsc::UnboundedSender<ComponentEvent>,
) -> Result<AssembledPage, PageError>
where
    S: FragmentSource,
{
    assemble_inner(request, source, Some(events)).await
}

async fn assemble_inner<S>(
    request: PageRequest<'_>,
    source: S,
    events: Option<mpsc::UnboundedSender<ComponentEvent>>,
) -> Result<AssembledPage, PageError>
where
    S: FragmentSource,
{
    let shell = source
        .fetch(request.shell_path)
        .await
        .map_err(|source| PageError::Shell {
            path: request.shell_path.to_string(),
            source,
        })?;

    let assembler = ComponentAssembler::new(request.registry, source, HtmlDocument::new(shell));

    let report = match events {
        Some(tx) => assembler.load_all_notifying(tx).await,
        None => assembler.load_all().await,
    };

    let mut html = assembler.into_document().into_string();
    if let Some(profile) = request.profile {
        html = interpolate(&html, profile, request.today);
    }

    Ok(AssembledPage { html, report })
}
