#![allow(dead_code)]

use toon_savings::{
    Batch, BatchInput, BatchObserver, DecodeOptions, Decoder, Delimiter, EncodeOptions, Encoder,
    Error, Format, ItemStatus, Result, Value,
};

/// The `serde_toon` codec behind the crate's codec traits.
pub struct Toon;

impl Encoder for Toon {
    fn encode(&self, value: &Value, options: &EncodeOptions) -> Result<String> {
        let delimiter = match options.delimiter {
            Delimiter::Comma => serde_toon::Delimiter::Comma,
            Delimiter::Tab => serde_toon::Delimiter::Tab,
            Delimiter::Pipe => serde_toon::Delimiter::Pipe,
        };
        let mut toon_options = serde_toon::ToonOptions::new()
            .with_indent(options.indent)
            .with_delimiter(delimiter);
        if let Some(marker) = options.length_marker {
            toon_options = toon_options.with_length_marker(marker);
        }
        serde_toon::to_string_with_options(value, toon_options).map_err(Error::encode)
    }
}

impl Decoder for Toon {
    fn decode(&self, text: &str, _: &DecodeOptions) -> Result<Value> {
        serde_toon::from_str::<Value>(text).map_err(Error::decode)
    }
}

/// Stand-in codec: compact JSON out, JSON in. Lossless for every `Value`.
pub struct CompactJson;

impl Encoder for CompactJson {
    fn encode(&self, value: &Value, _: &EncodeOptions) -> Result<String> {
        Ok(value.to_string())
    }
}

impl Decoder for CompactJson {
    fn decode(&self, text: &str, _: &DecodeOptions) -> Result<Value> {
        Ok(Format::Json.parse(text)?.into_value())
    }
}

/// Batch inputs named `item1.json`, `item2.json`, ...
pub fn inputs(texts: &[&str]) -> Vec<BatchInput> {
    texts
        .iter()
        .enumerate()
        .map(|(i, text)| BatchInput::new(format!("item{}.json", i + 1), *text))
        .collect()
}

/// Records every callback a batch run makes.
#[derive(Default)]
pub struct Recorder {
    pub started_with: Vec<ItemStatus>,
    pub updates: Vec<(usize, ItemStatus)>,
    pub finished: usize,
}

impl Recorder {
    /// Status sequence seen for the item at `index`.
    pub fn history(&self, index: usize) -> Vec<ItemStatus> {
        self.updates
            .iter()
            .filter(|(i, _)| *i == index)
            .map(|(_, status)| *status)
            .collect()
    }
}

impl BatchObserver for Recorder {
    fn on_start(&mut self, batch: &Batch) {
        self.started_with = batch.items().iter().map(|item| item.status()).collect();
    }

    fn on_update(&mut self, batch: &Batch, index: usize) {
        self.updates.push((index, batch.items()[index].status()));
    }

    fn on_finish(&mut self, _batch: &Batch) {
        self.finished += 1;
    }
}
