//! Fixed user-facing templates. The pipeline never generates free text; each
//! outcome maps onto exactly one of these Hinglish messages.

use crate::ledger::LedgerEntry;
use crate::query::WeekSummary;
use crate::utils::format_inr;

pub fn confirmation(entry: &LedgerEntry) -> String {
    format!(
        "Theek hai! ✅ {} record ho gayi hai.\n\nItem: {}\nAmount: ₹{}",
        entry.entry_type.label(),
        entry.item.as_deref().unwrap_or("General"),
        format_inr(entry.amount)
    )
}

pub fn today_sales(total: f64) -> String {
    format!("Aaj ki total sale ₹{} hui hai. 📈", format_inr(total))
}

pub fn person_credit(person: &str, balance: f64) -> String {
    if balance > 0.0 {
        format!("{} ka ₹{} udhar hai.", person, format_inr(balance))
    } else if balance < 0.0 {
        format!(
            "{} ke ₹{} aapke paas jama hain.",
            person,
            format_inr(-balance)
        )
    } else {
        format!("{} ka koi udhar nahi hai.", person)
    }
}

pub fn week_summary(summary: &WeekSummary) -> String {
    format!(
        "📊 Is hafte ke aankde:\n\n🏷️ Total Sale: ₹{}\n📝 Transaction: {}\n💳 Total Udhar: ₹{}",
        format_inr(summary.total_sales),
        summary.transaction_count,
        format_inr(summary.total_credit)
    )
}

pub fn sales_by_date(date: &str, total: f64) -> String {
    format!("{} ki sale ₹{} hui hai.", date, format_inr(total))
}

pub fn person_name_missing() -> &'static str {
    "Kripya person ka naam batayein."
}

pub fn payment_details_missing() -> &'static str {
    "Payment record karne ke liye naam ya amount batayein.\nJaise: \"Rahul ne ₹200 wapas diye\""
}

pub fn nothing_outstanding(person: &str) -> String {
    format!("{} ka koi udhar baki nahi hai.", person)
}

pub fn invalid_transaction() -> &'static str {
    "Maaf kijiye, yeh transaction record nahi ho payi. Amount sahi se batayein.\nJaise: \"Maggie ₹240 me biki\""
}

pub fn retry_later() -> &'static str {
    "Abhi records check nahi ho pa rahe. Thodi der mein phir try karein."
}

pub fn help() -> &'static str {
    "Main aapka bahi-khata assistant hoon. 🙏 Aap aise messages bhej sakte hain:\n\n\
     🏷️ \"Maggie ₹240 me biki\"\n\
     💳 \"Rahul ko ₹500 udhar diya\"\n\
     💰 \"Rahul ne sara udhar wapas diya\"\n\
     📈 \"Aaj ki sale kitni hui?\"\n\
     📊 \"Is hafte ka summary batao\"\n\
     🔍 \"Rahul ka udhar kitna hai?\""
}
