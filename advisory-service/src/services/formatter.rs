//! Renders a [`ModelReply`] into the chat-style advisory report.

use crate::models::{AdvisoryReport, ModelReply};

pub const INVALID_FORMAT_MESSAGE: &str = "❌ Invalid response format received.";

const SEPARATOR: &str = "━━━━━━━━━━━━━━━━━━━━━━";

/// Format any reply. Total: always returns a non-empty string.
pub fn format(reply: &ModelReply) -> String {
    match reply {
        ModelReply::Unstructured(_) => INVALID_FORMAT_MESSAGE.to_string(),
        ModelReply::Error(payload) => format!("❌ Error: {}", payload.error),
        ModelReply::Advisory(payload) => render(&AdvisoryReport::from(payload)),
    }
}

fn render(r: &AdvisoryReport) -> String {
    let sep = SEPARATOR;
    let report = format!(
        "
🌿 **Air Quality Health Advisory Report**

{sep}

🧍 **Profile Summary**
{profile}

{sep}

📊 **Air Quality Risk Assessment**
• Risk Level: {risk_level}
• Health Impact: {impact}

{sep}

🏃 **Activity Guidance**
• Activity: {activity}
• Safe To Do: {is_safe}
• Recommendation: {recommendation}
• Precautions: {activity_precautions}

{sep}

🛡️ **Recommended Precautions**

Outdoor:
{outdoor}

Mask:
{mask}

Indoor:
{home}

{sep}

👨‍👩‍👧‍👦 **Special Care**

Children:
{children}

Elderly:
{elderly}

Respiratory/Heart:
{respiratory}

{sep}

🌱 **Lifestyle Tips**
{lifestyle}

{sep}

⚠️ **Disclaimer**
{disclaimer}
",
        profile = r.profile_summary,
        risk_level = r.risk_level,
        impact = r.impact,
        activity = r.activity,
        is_safe = r.is_safe,
        recommendation = r.recommendation,
        activity_precautions = r.activity_precautions,
        outdoor = r.outdoor_advice,
        mask = r.mask_recommendation,
        home = r.home_protection,
        children = r.children,
        elderly = r.elderly,
        respiratory = r.respiratory_patients,
        lifestyle = r.lifestyle_tips,
        disclaimer = r.disclaimer,
    );

    report.trim().to_string()
}
