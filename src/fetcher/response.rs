//! Parsing of trade API XML pages.
//!
//! The API wraps results as `response/header` + `response/body/items/item`, but
//! items are collected wherever an `<item>` element appears. Each item keeps the
//! text of its direct children by element name; typed coercion happens later in
//! [`RawTradeItem::to_record`].

use crate::error::{Error, Result};
use crate::types::TradeRecord;
use crate::utils::{coerce, coerce_amount, coerce_finite};
use quick_xml::Reader;
use quick_xml::events::Event;
use std::collections::HashMap;

/// Result codes the API uses for a normal response
const SUCCESS_CODES: [&str; 2] = ["00", "000"];

/// Result code for a month with no trades (`NODATA_ERROR`); the page is empty
const NO_DATA_CODE: &str = "03";

/// One `<item>` element: direct child element name → trimmed text
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawTradeItem {
    fields: HashMap<String, String>,
}

impl RawTradeItem {
    /// Text of a child element; `None` if the element is absent
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Coerce the raw fields into a [`TradeRecord`]
    ///
    /// Numeric fields that fail to parse become `None`. A missing `sggCd`
    /// falls back to `region`, the code the page was requested for.
    pub fn to_record(&self, region: &str) -> TradeRecord {
        TradeRecord {
            apt_dong: self.field("aptDong").map(str::to_string),
            apt_nm: self.field("aptNm").unwrap_or_default().to_string(),
            build_year: coerce(self.field("buildYear")),
            deal_amount: coerce_amount(self.field("dealAmount")),
            deal_day: coerce(self.field("dealDay")),
            deal_month: coerce(self.field("dealMonth")),
            deal_year: coerce(self.field("dealYear")),
            exclu_use_ar: coerce_finite(self.field("excluUseAr")),
            floor: coerce(self.field("floor")),
            sgg_cd: self
                .field("sggCd")
                .filter(|code| !code.is_empty())
                .unwrap_or(region)
                .to_string(),
            umd_nm: self.field("umdNm").map(str::to_string),
        }
    }
}

/// One parsed page of the trade API
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TradePage {
    /// Items in document order
    pub items: Vec<RawTradeItem>,
    /// `header/resultCode`
    pub result_code: Option<String>,
    /// `header/resultMsg`
    pub result_msg: Option<String>,
    /// `body/totalCount`
    pub total_count: Option<u64>,
    /// `returnReasonCode` of an `OpenAPI_ServiceResponse` error envelope
    pub reason_code: Option<String>,
    /// `returnAuthMsg` (or `errMsg`) of an error envelope
    pub reason_msg: Option<String>,
}

impl TradePage {
    /// Fail if the API reported an error instead of data
    pub fn check_result(&self) -> Result<()> {
        if let Some(code) = &self.reason_code {
            return Err(Error::Upstream {
                code: code.clone(),
                message: self.reason_msg.clone().unwrap_or_default(),
            });
        }

        match &self.result_code {
            Some(code) if !is_data_code(code) => Err(Error::Upstream {
                code: code.clone(),
                message: self.result_msg.clone().unwrap_or_default(),
            }),
            _ => Ok(()),
        }
    }
}

/// Parse an XML page
///
/// # Errors
/// Returns [`Error::MalformedResponse`] if the document is empty, not
/// well-formed, ends with unclosed elements, or has content after the
/// document element.
pub fn parse_page(xml: &str) -> Result<TradePage> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut page = TradePage::default();
    let mut stack: Vec<String> = Vec::new();
    let mut text = String::new();
    let mut saw_root = false;
    let mut root_closed = false;
    // Open item: stack depth of the <item> element and the fields collected so far
    let mut open_item: Option<(usize, RawTradeItem)> = None;

    loop {
        let event = reader.read_event().map_err(|e| {
            Error::MalformedResponse(format!(
                "XML error at byte {}: {}",
                reader.buffer_position(),
                e
            ))
        })?;

        match event {
            Event::Start(e) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                if root_closed {
                    return Err(trailing_element(&name));
                }
                if name == "item" && open_item.is_none() {
                    open_item = Some((stack.len(), RawTradeItem::default()));
                }
                stack.push(name);
                saw_root = true;
                text.clear();
            }
            Event::Empty(e) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                if root_closed {
                    return Err(trailing_element(&name));
                }
                saw_root = true;
                root_closed = stack.is_empty();
                match &mut open_item {
                    Some((depth, item)) if stack.len() == *depth + 1 => {
                        item.fields.entry(name).or_default();
                    }
                    Some(_) => {}
                    None if name == "item" => page.items.push(RawTradeItem::default()),
                    None => {}
                }
            }
            Event::Text(t) => {
                let value = t.unescape().map_err(|e| {
                    Error::MalformedResponse(format!("invalid text content: {}", e))
                })?;
                if root_closed {
                    return Err(Error::MalformedResponse(
                        "text after document element".to_string(),
                    ));
                }
                text.push_str(&value);
            }
            Event::CData(c) => {
                text.push_str(&String::from_utf8_lossy(&c.into_inner()));
            }
            Event::End(_) => {
                let name = stack.pop().unwrap_or_default();
                let value = text.trim().to_string();
                text.clear();
                root_closed = stack.is_empty();

                match open_item.take() {
                    Some((depth, item)) if stack.len() == depth => {
                        page.items.push(item);
                    }
                    Some((depth, mut item)) => {
                        if stack.len() == depth + 1 {
                            item.fields.entry(name).or_insert(value);
                        }
                        open_item = Some((depth, item));
                    }
                    None => record_envelope_field(&mut page, &name, value),
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !saw_root {
        return Err(Error::MalformedResponse("empty document".to_string()));
    }
    if let Some(open) = stack.last() {
        return Err(Error::MalformedResponse(format!(
            "unexpected end of document inside <{}>",
            open
        )));
    }

    Ok(page)
}

fn is_data_code(code: &str) -> bool {
    SUCCESS_CODES.contains(&code) || code == NO_DATA_CODE
}

fn trailing_element(name: &str) -> Error {
    Error::MalformedResponse(format!("<{}> after document element", name))
}

fn record_envelope_field(page: &mut TradePage, name: &str, value: String) {
    let slot = match name {
        "resultCode" => &mut page.result_code,
        "resultMsg" => &mut page.result_msg,
        "returnReasonCode" => &mut page.reason_code,
        "returnAuthMsg" | "errMsg" => &mut page.reason_msg,
        "totalCount" => {
            if page.total_count.is_none() {
                page.total_count = value.parse().ok();
            }
            return;
        }
        _ => return,
    };
    if slot.is_none() {
        *slot = Some(value);
    }
}
