//! User-facing strings. The site is Thai, so replies are too.

use crate::error::LookupError;

pub const COMPONENTS_LABEL: &str = "🍗 ในชุดประกอบด้วย:";
pub const PRICE_LABEL: &str = "💰 ราคา:";
pub const DESCRIPTION_LABEL: &str = "📝 รายละเอียด:";
pub const INGREDIENTS_LABEL: &str = "🥘 ส่วนประกอบ:";

/// The product was found but nothing could be extracted from its page.
pub fn no_details(query: &str) -> String {
    format!("พบเมนู '{}' แต่ไม่สามารถดึงข้อมูลรายละเอียดได้", query)
}

/// No product matched the query.
pub fn not_found(query: &str) -> String {
    format!("ไม่พบเมนู '{}' ในระบบ หรือเซิร์ฟเวอร์ตอบสนองช้า", query)
}

/// Any other lookup failure.
pub fn lookup_failed(query: &str, reason: &str) -> String {
    format!("เกิดข้อผิดพลาดในการค้นหา '{}': {}", query, reason)
}

/// Message shown in place of a report when a lookup fails.
pub fn for_error(query: &str, error: &LookupError) -> String {
    match error {
        LookupError::NotFound { .. } => not_found(query),
        other => lookup_failed(query, &other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_error() {
        let err = LookupError::NotFound { query: "Wingz".to_string() };
        assert_eq!(for_error("Wingz", &err), "ไม่พบเมนู 'Wingz' ในระบบ หรือเซิร์ฟเวอร์ตอบสนองช้า");

        let err = LookupError::AddressResolution { query: "Wingz".to_string() };
        let message = for_error("Wingz", &err);
        assert!(message.starts_with("เกิดข้อผิดพลาดในการค้นหา 'Wingz': "));
        assert!(message.contains("product link"));
    }

    #[test]
    fn test_no_details() {
        assert_eq!(no_details("Wingz"), "พบเมนู 'Wingz' แต่ไม่สามารถดึงข้อมูลรายละเอียดได้");
    }
}
