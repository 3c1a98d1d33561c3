// Prompt construction for player scouting reports.
//
// The report is a short motivational paragraph in Arabic, built from the
// player's card numbers. All figures are pre-computed and embedded in the
// prompt so the model writes prose instead of doing arithmetic.

use crate::league::player::Player;

/// Fixed report substituted when generation fails for any reason (missing
/// key, network error, empty completion). Never surfaced as an error.
pub const FALLBACK_REPORT: &str = "تحليل اللاعب جاهز للميدان.";

/// Return the static system prompt for scouting report calls.
pub fn system_prompt() -> String {
    "أنت محلل كروي محترف تكتب تقارير كشافة لدوري كرة قدم للهواة. \
     اكتب بالعربية الفصحى بأسلوب حماسي ومحفز. \
     اعتمد على الأرقام المعطاة ولا تقم بأي عمليات حسابية. \
     ركز على نقاط القوة، ولا يتجاوز التقرير 30 كلمة."
        .to_string()
}

/// Build the user prompt for one player's scouting report.
pub fn build_scouting_report_prompt(player: &Player) -> String {
    format!(
        "اكتب تقرير كشافة قصيرا للاعب التالي:\n\
         الاسم: {}\n\
         المركز: {}\n\
         التقييم العام: {}\n\
         الإحصائيات:\n\
         - السرعة: {}\n\
         - التسديد: {}\n\
         - التمرير: {}\n\
         - المراوغة: {}\n\
         - الدفاع: {}\n\
         - القوة البدنية: {}",
        player.name,
        player.position.code(),
        player.overall,
        player.attributes.pace,
        player.attributes.shooting,
        player.attributes.passing,
        player.attributes.dribbling,
        player.attributes.defending,
        player.attributes.physical,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::league::player::{Attribute, Attributes, Position};
    use crate::league::store::tests_support;

    #[test]
    fn system_prompt_sets_language_and_word_limit() {
        let sp = system_prompt();
        assert!(sp.contains("بالعربية"), "should require Arabic");
        assert!(sp.contains("30"), "should cap the word count");
    }

    #[test]
    fn report_prompt_embeds_card_numbers() {
        let mut player = tests_support::player("p1", "عمر الحضرمي", Some("team_1"));
        player.position = Position::Forward;
        player.attributes = Attributes::uniform(70);
        player.attributes.set(Attribute::Shooting, 91);
        player.overall = player.attributes.overall();

        let prompt = build_scouting_report_prompt(&player);
        assert!(prompt.contains("عمر الحضرمي"));
        assert!(prompt.contains("FWD"));
        assert!(prompt.contains("91"));
        assert!(prompt.contains(&player.overall.to_string()));
    }

    #[test]
    fn fallback_report_is_nonempty_arabic() {
        assert!(!FALLBACK_REPORT.is_empty());
        assert!(FALLBACK_REPORT.chars().any(|c| ('\u{0600}'..='\u{06FF}').contains(&c)));
    }
}
