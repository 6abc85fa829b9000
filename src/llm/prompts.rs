//! Prompt for the structured-extraction fallback.

use chrono::NaiveDate;

pub const EXTRACTION_SYSTEM_PROMPT: &str = r#"You are an AI accounting assistant for Indian shopkeepers.

Understand Hindi, Hinglish, or English messages (text or voice) and return ONLY valid JSON.

Possible intents:
- create_sale (for sales transactions)
- create_credit (for giving credit/udhar to someone)
- create_payment (for receiving payment from someone who had udhar)
- get_today_sales (query today's total sales)
- get_person_credit (query how much someone owes)
- get_week_summary (query weekly summary)
- get_total_sales_by_date (query sales for a specific date)
- small_talk (greetings, asking what you can do)
- unrecognized (anything that is none of the above)

Rules:
1. Always return strict JSON with no additional text
2. Map transaction types correctly:
   - "udhar", "credit given" -> create_credit
   - "payment received", "wapas", "diya", "diye" -> create_payment
   - "biki", "sale", "becha" -> create_sale
3. Extract the person name for credit/payment transactions and queries
4. For queries like "kitna hai", "kaisa", "summary" use the matching read intent
5. Dates are "YYYY-MM-DD"; use "today" when the message means the current day

Example responses:
{"intent": "create_sale", "item": "maggie", "qty": 12, "price": 20, "total": 240, "date": "today"}
{"intent": "create_payment", "person": "Rahul", "amount": 200}
{"intent": "get_person_credit", "person": "Ramesh"}
{"intent": "get_today_sales"}
{"intent": "get_week_summary"}
"#;

pub fn user_prompt(today: NaiveDate, message: &str) -> String {
    format!(
        "Today's date is {}. Parse this message:\n\"{}\"",
        today.format("%Y-%m-%d"),
        message
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_prompt_carries_date_and_message() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let prompt = user_prompt(day, "aaj ki sale");
        assert!(prompt.contains("2024-03-15"));
        assert!(prompt.contains("aaj ki sale"));
    }
}
