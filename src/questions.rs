use crate::error::{MirrorError, Result};
use crate::types::assessment::{AssessmentType, Category, Response};
use serde::Serialize;
use std::collections::HashSet;

pub const MIN_SCORE: u8 = 1;
pub const MAX_SCORE: u8 = 5;
/// Every question counts once; category weights live in the scoring tables.
pub const QUESTION_WEIGHT: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Question {
    pub id: String,
    pub category: &'static str,
    pub text: &'static str,
    pub weight: f64,
}

const MALE_BANK: [(Category, &str); 60] = [
    (Category::Mental, "I take accountability when I'm wrong instead of deflecting blame."),
    (Category::Mental, "I respond calmly when my partner challenges me."),
    (Category::Mental, "I am open to personal growth and avoid outdated mindsets."),
    (Category::Mental, "I listen with the intent to understand, not just to respond."),
    (Category::Mental, "I manage my emotions constructively when triggered."),
    (Category::Mental, "I reflect on how my behavior affects my partner."),
    (Category::Mental, "I am comfortable being vulnerable and see it as strength."),
    (Category::Mental, "I correct bad habits instead of expecting my partner to tolerate them."),
    (Category::Mental, "I handle constructive criticism without defensiveness."),
    (Category::Mental, "I avoid conflating being 'alpha' with emotional unavailability."),
    (Category::Emotional, "I make space for my partner's emotions without trying to fix them."),
    (Category::Emotional, "I regularly express appreciation, affection, and care non-sexually."),
    (Category::Emotional, "I am emotionally consistent in showing care."),
    (Category::Emotional, "I validate my partner's feelings instead of dismissing them."),
    (Category::Emotional, "I openly share my emotions instead of keeping them inside."),
    (Category::Emotional, "I make my partner feel emotionally safe."),
    (Category::Emotional, "I remain calm and engaged when my partner is upset."),
    (Category::Emotional, "I value emotional intimacy as much as physical intimacy."),
    (Category::Emotional, "I give reassurance without feeling controlled."),
    (Category::Emotional, "My partner feels seen, heard, and emotionally secure with me."),
    (Category::Physical, "I maintain daily hygiene and grooming habits."),
    (Category::Physical, "I stay mindful of my health and appearance since the relationship began."),
    (Category::Physical, "I dress in a way that reflects pride in my appearance."),
    (Category::Physical, "I try to impress my partner physically consistently."),
    (Category::Physical, "I am attentive to my partner's sexual needs as well as my own."),
    (Category::Physical, "I bring physical affection outside of sexual moments."),
    (Category::Physical, "I work consistently on fitness, energy, and presentation."),
    (Category::Physical, "I listen to my partner's feedback about attraction."),
    (Category::Physical, "I show effort in date nights and special occasions."),
    (Category::Physical, "My partner would describe me as physically present, attractive, and invested."),
    (Category::Financial, "I have a clear financial plan and savings habits."),
    (Category::Financial, "I am honest about my finances and avoid hiding spending/debt."),
    (Category::Financial, "I discuss financial burdens openly with my partner."),
    (Category::Financial, "I focus on building a future with long-term goals."),
    (Category::Financial, "I invest in personal growth instead of wasting money to impress others."),
    (Category::Financial, "I comfortably fulfill provider roles without resentment."),
    (Category::Financial, "I support my partner's earning success without feeling threatened."),
    (Category::Financial, "I manage money with discipline, not impulsively."),
    (Category::Financial, "I am generous in healthy ways without manipulation."),
    (Category::Financial, "My partner feels financially secure with me."),
    (Category::FamilyCultural, "I respect my partner's culture and avoid imposing mine."),
    (Category::FamilyCultural, "I protect my partner from family disrespect."),
    (Category::FamilyCultural, "I shield my partner from family drama and pressure."),
    (Category::FamilyCultural, "I make my partner feel like we're in a partnership, not just joining my tribe."),
    (Category::FamilyCultural, "I value her family's involvement as much as my own."),
    (Category::FamilyCultural, "I build healthy boundaries between my family and our relationship."),
    (Category::FamilyCultural, "I avoid expecting submission without offering security and respect."),
    (Category::FamilyCultural, "I discuss cultural clashes openly instead of dictating."),
    (Category::FamilyCultural, "I avoid using tradition or religion as excuses for control."),
    (Category::FamilyCultural, "My partner feels I integrate family values with emotional intelligence."),
    (Category::ConflictResolution, "I communicate openly instead of shutting down when angry."),
    (Category::ConflictResolution, "I avoid raising my voice, sarcasm, or threats during fights."),
    (Category::ConflictResolution, "I de-escalate conflicts instead of dominating them."),
    (Category::ConflictResolution, "I stay engaged in disagreements until resolution."),
    (Category::ConflictResolution, "I take accountability after conflicts instead of just moving on."),
    (Category::ConflictResolution, "I avoid using silence or ignoring emotional repair."),
    (Category::ConflictResolution, "I listen to my partner's pain without deflecting blame."),
    (Category::ConflictResolution, "I avoid holding grudges or bringing up past fights."),
    (Category::ConflictResolution, "I seek clarity in arguments instead of rushing to end them."),
    (Category::ConflictResolution, "My partner feels safe, heard, and respected even during disagreements."),
];

const FEMALE_BANK: [(Category, &str); 60] = [
    (Category::Mental, "I remain calm and avoid escalating small disagreements into emotional reactions."),
    (Category::Mental, "I communicate calmly about what's wrong when I'm hurt instead of expecting my partner to guess."),
    (Category::Mental, "I avoid using emotional withdrawal or silence as a punishment."),
    (Category::Mental, "I take responsibility for my role in relationship problems."),
    (Category::Mental, "I avoid saying hurtful things impulsively."),
    (Category::Mental, "I stay calm and rational when my emotions are triggered."),
    (Category::Mental, "I avoid using my emotions to gain control in conflict situations."),
    (Category::Mental, "I self-reflect when my partner gives feedback instead of getting defensive."),
    (Category::Mental, "I manage my mood independently without relying on my partner to fix it."),
    (Category::Mental, "I am willing to unlearn negative patterns from past relationships."),
    (Category::Emotional, "I regularly show appreciation for my partner, not just when things go wrong."),
    (Category::Emotional, "I focus on how loved I make my partner feel as much as how loved I feel."),
    (Category::Emotional, "I acknowledge and respect my partner's emotional needs."),
    (Category::Emotional, "I listen to my partner's feelings without making it about myself."),
    (Category::Emotional, "I self-regulate emotionally and do not expect constant reassurance."),
    (Category::Emotional, "I create emotional safety in my relationship."),
    (Category::Emotional, "I am emotionally open and available to talk."),
    (Category::Emotional, "I address issues directly without using tears or drama."),
    (Category::Emotional, "I offer peace and support when my partner is stressed."),
    (Category::Emotional, "I view emotional nurturing as a shared responsibility."),
    (Category::Physical, "I have maintained or improved my physical appearance since entering the relationship."),
    (Category::Physical, "I dress in a way that makes my partner feel proud to be seen with me."),
    (Category::Physical, "I prioritize fitness and health consistently."),
    (Category::Physical, "I maintain effort in my appearance without using excuses."),
    (Category::Physical, "I initiate physical intimacy without needing prompting."),
    (Category::Physical, "I show affection without using touch as a transaction or test."),
    (Category::Physical, "I maintain grooming habits as I did when first dating."),
    (Category::Physical, "I avoid rejecting physical connection due to insecurity or ego."),
    (Category::Physical, "I am sexually open, communicative, and attentive to my partner's needs."),
    (Category::Physical, "My partner would describe my appearance as respectful, attractive, and feminine."),
    (Category::Financial, "I have my own financial plan and contribute to building our future together."),
    (Category::Financial, "I focus on what we can build together rather than what my partner can buy me."),
    (Category::Financial, "I save money and avoid spending based on impulsive feelings."),
    (Category::Financial, "I am transparent about purchases and debt with my partner."),
    (Category::Financial, "I avoid criticizing my partner's financial habits while relying on their money."),
    (Category::Financial, "I view money as a shared tool, not a test of masculinity."),
    (Category::Financial, "I live within my means and avoid chasing a lifestyle image."),
    (Category::Financial, "I openly discuss financial goals and struggles with my partner."),
    (Category::Financial, "I contribute effort, planning, and discipline toward our future together."),
    (Category::Financial, "My partner would describe me as financially responsible."),
    (Category::FamilyCultural, "I respect my partner's culture as much as my own."),
    (Category::FamilyCultural, "I defend my partner if my family disrespects them."),
    (Category::FamilyCultural, "I believe marriage means partnership, not bringing my partner into my family's control."),
    (Category::FamilyCultural, "I avoid expecting my partner to conform completely to my traditions."),
    (Category::FamilyCultural, "I respect my partner's cultural values without dismissing them."),
    (Category::FamilyCultural, "I bring peace when family is involved in our relationship."),
    (Category::FamilyCultural, "I adapt and compromise during cultural clashes."),
    (Category::FamilyCultural, "I understand and value the role of family in my partner's upbringing."),
    (Category::FamilyCultural, "I prioritize loyalty to my partner over outside opinions."),
    (Category::FamilyCultural, "I have discussed family roles and expectations openly with my partner."),
    (Category::ConflictResolution, "I de-escalate conflicts calmly and constructively."),
    (Category::ConflictResolution, "I start difficult conversations with curiosity instead of accusations."),
    (Category::ConflictResolution, "I stay focused on the current issue during disagreements."),
    (Category::ConflictResolution, "I apologize genuinely when I am wrong."),
    (Category::ConflictResolution, "I prioritize being understood over being right."),
    (Category::ConflictResolution, "I avoid punishing my partner with withdrawal or attitude after fights."),
    (Category::ConflictResolution, "I admit mistakes clearly and work to change behavior."),
    (Category::ConflictResolution, "I handle hard conversations without crying, yelling, or blaming."),
    (Category::ConflictResolution, "I seek clarity by asking questions instead of making assumptions."),
    (Category::ConflictResolution, "My partner would say I fight to fix issues, not just to vent."),
];

fn build(bank: &[(Category, &'static str)]) -> Vec<Question> {
    bank.iter()
        .enumerate()
        .map(|(index, &(category, text))| Question {
            id: format!("q{}", index + 1),
            category: category.name(),
            text,
            weight: 1.0,
        })
        .collect()
}

pub fn questions_for(assessment_type: AssessmentType) -> Vec<Question> {
    match assessment_type {
        AssessmentType::HighValueMan => build(&MALE_BANK),
        AssessmentType::WifeMaterial | AssessmentType::BridalPrice => build(&FEMALE_BANK),
    }
}

pub fn questions_by_category(questions: &[Question]) -> Vec<(&'static str, Vec<&Question>)> {
    let mut grouped: Vec<(&'static str, Vec<&Question>)> = Vec::new();
    for question in questions {
        match grouped.iter_mut().find(|(name, _)| *name == question.category) {
            Some((_, members)) => members.push(question),
            None => grouped.push((question.category, vec![question])),
        }
    }
    grouped
}

/// Boundary check for submitted answer sheets: Likert range, unit weight and
/// one answer per question.
pub fn validate_responses(responses: &[Response]) -> Result<()> {
    if responses.is_empty() {
        return Err(MirrorError::InvalidResponses(
            "at least one response is required".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for response in responses {
        if !(MIN_SCORE..=MAX_SCORE).contains(&response.score) {
            return Err(MirrorError::InvalidResponses(format!(
                "question {} scored {}; scores must be between {MIN_SCORE} and {MAX_SCORE}",
                response.question_id, response.score
            )));
        }
        if response.weight != QUESTION_WEIGHT {
            return Err(MirrorError::InvalidResponses(format!(
                "question {} has weight {}; answers must carry weight {QUESTION_WEIGHT}",
                response.question_id, response.weight
            )));
        }
        if !seen.insert(response.question_id.as_str()) {
            return Err(MirrorError::InvalidResponses(format!(
                "question {} answered more than once",
                response.question_id
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answer(id: &str, score: u8) -> Response {
        Response {
            question_id: id.to_string(),
            category: "Mental Traits".to_string(),
            score,
            weight: QUESTION_WEIGHT,
        }
    }

    #[test]
    fn every_bank_has_ten_questions_per_category() {
        for kind in AssessmentType::ALL {
            let questions = questions_for(kind);
            assert_eq!(questions.len(), 60);
            let grouped = questions_by_category(&questions);
            assert_eq!(grouped.len(), 6);
            for ((name, members), category) in grouped.iter().zip(Category::ALL) {
                assert_eq!(*name, category.name());
                assert_eq!(members.len(), 10);
            }
        }
    }

    #[test]
    fn female_variants_share_a_bank() {
        assert_eq!(
            questions_for(AssessmentType::WifeMaterial),
            questions_for(AssessmentType::BridalPrice)
        );
        assert_ne!(
            questions_for(AssessmentType::HighValueMan)[0].text,
            questions_for(AssessmentType::WifeMaterial)[0].text
        );
    }

    #[test]
    fn question_ids_follow_bank_order() {
        let questions = questions_for(AssessmentType::HighValueMan);
        assert_eq!(questions[0].id, "q1");
        assert_eq!(questions[59].id, "q60");
        assert_eq!(questions[59].category, "Conflict Resolution Style");
    }

    #[test]
    fn validate_rejects_out_of_range_scores() {
        let err = validate_responses(&[answer("q1", 6)]).expect_err("6 is out of range");
        assert!(err.to_string().contains("between 1 and 5"));
        assert!(validate_responses(&[answer("q1", 0)]).is_err());
    }

    #[test]
    fn validate_rejects_scaled_weights() {
        let heavy = Response {
            weight: 3.0,
            ..answer("q1", 5)
        };
        let negative = Response {
            weight: -2.0,
            ..answer("q2", 5)
        };
        let undefined = Response {
            weight: f64::NAN,
            ..answer("q3", 5)
        };
        for bad in [heavy, negative, undefined] {
            let err = validate_responses(&[answer("q9", 4), bad]).expect_err("weight should fail");
            assert!(err.to_string().contains("weight"));
        }
    }

    #[test]
    fn validated_sheets_stay_within_percentage_bounds() {
        let sheet = [answer("q1", 5), answer("q2", 1), answer("q3", 3)];
        validate_responses(&sheet).expect("sheet should validate");
        let result = crate::scoring::calculate_scores(
            &crate::scoring::tables::ScoringTables::default(),
            &sheet,
            AssessmentType::HighValueMan,
        );
        assert!((0.0..=100.0).contains(&result.overall_percentage));
        assert!(result
            .category_scores
            .iter()
            .all(|score| (0.0..=100.0).contains(&score.percentage)));
    }

    #[test]
    fn validate_rejects_duplicate_answers() {
        let err = validate_responses(&[answer("q1", 3), answer("q1", 4)])
            .expect_err("duplicate should fail");
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn validate_accepts_complete_sheet() {
        assert!(validate_responses(&[answer("q1", 1), answer("q2", 5)]).is_ok());
        assert!(validate_responses(&[]).is_err());
    }
}
