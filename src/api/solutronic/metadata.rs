use std::sync::LazyLock;

use scraper::{Html, Selector};

use crate::{api::solutronic::parser::selector, core::metadata::PartialMetadata};

static HEADING: LazyLock<Selector> = LazyLock::new(|| selector("h1"));

const FIRMWARE_LABEL: &str = "FW-Release:";

/// Best-effort device identity from the page markup.
///
/// The heading reads `model<br>manufacturer`, and the firmware version follows the
/// `FW-Release:` label somewhere in the page text. Anything missing is left unset.
pub fn extract_metadata(body: &str) -> PartialMetadata {
    let document = Html::parse_document(body);
    let mut metadata = PartialMetadata::default();

    if let Some(heading) = document.select(&HEADING).next() {
        let mut parts =
            heading.text().flat_map(str::lines).map(str::trim).filter(|part| !part.is_empty());
        metadata.model = parts.next().map(ToOwned::to_owned);
        metadata.manufacturer = parts.next().map(ToOwned::to_owned);
    }

    metadata.firmware = document
        .root_element()
        .text()
        .flat_map(str::lines)
        .map(str::trim)
        .find_map(|line| line.strip_prefix(FIRMWARE_LABEL))
        .map(str::trim)
        .filter(|firmware| !firmware.is_empty())
        .map(ToOwned::to_owned);

    metadata
}
