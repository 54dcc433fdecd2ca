// src/bank.rs

//! The fixed question bank.
//!
//! Seven weighted categories with five questions each; every question has
//! exactly four options worth 1..=5 points. Question text and point values
//! define the scoring model and never change at runtime.

/// Questions in every category.
pub const QUESTIONS_PER_CATEGORY: usize = 5;

/// Options offered for every question.
pub const OPTIONS_PER_QUESTION: usize = 4;

/// Highest point value a single option can carry.
pub const MAX_POINTS: u8 = 5;

/// Highest raw score a category can reach (5 questions x 5 points).
pub const MAX_RAW: u32 = (QUESTIONS_PER_CATEGORY as u32) * (MAX_POINTS as u32);

/// Total number of questions across the bank.
pub const TOTAL_QUESTIONS: usize = CATEGORIES.len() * QUESTIONS_PER_CATEGORY;

/// A weighted scoring dimension.
#[derive(Debug)]
pub struct Category {
    /// Stable machine identifier (e.g. `process`).
    pub key: &'static str,
    /// Human readable label.
    pub name: &'static str,
    /// Share of the overall score, in percent.
    pub weight: u8,
    pub questions: [Question; QUESTIONS_PER_CATEGORY],
}

#[derive(Debug)]
pub struct Question {
    pub text: &'static str,
    pub options: [AnswerOption; OPTIONS_PER_QUESTION],
}

/// One selectable answer. Points are the sole scoring currency.
#[derive(Debug)]
pub struct AnswerOption {
    pub text: &'static str,
    pub points: u8,
}

const fn opt(text: &'static str, points: u8) -> AnswerOption {
    AnswerOption { text, points }
}

const fn q(text: &'static str, options: [AnswerOption; OPTIONS_PER_QUESTION]) -> Question {
    Question { text, options }
}

/// Returns the category with the given key.
pub fn category(key: &str) -> Option<&'static Category> {
    CATEGORIES.iter().find(|c| c.key == key)
}

/// Position of the category with the given key in bank order.
pub fn category_index(key: &str) -> Option<usize> {
    CATEGORIES.iter().position(|c| c.key == key)
}

pub static CATEGORIES: [Category; 7] = [
    Category {
        key: "willingness",
        name: "Willingness to Learn",
        weight: 15,
        questions: [
            q(
                "Your team implements a new AI tool you've never used before. What do you do?",
                [
                    opt("Stick to old tools and avoid the new AI.", 1),
                    opt("Learn basics on your own or with colleagues; try it on a small task.", 5),
                    opt("Wait for someone to explicitly train you before engaging.", 2),
                    opt("Argue it won't help and suggest skipping it.", 1),
                ],
            ),
            q(
                "A client rolls out an AI-driven reporting process. Your first step is…",
                [
                    opt("Skim the docs later when time allows.", 2),
                    opt("Block 30 minutes to read docs and test with a sample report.", 5),
                    opt("Ask your manager to summarize and tell you what to do.", 2),
                    opt("Ignore until it becomes mandatory.", 1),
                ],
            ),
            q(
                "You notice an AI feature inside a tool you already use.",
                [
                    opt("Disable it so the UI stays the same.", 1),
                    opt("Open a tutorial and test it on low-risk work.", 5),
                    opt("Ask someone else to try it and report back.", 3),
                    opt("Wait for an SOP before touching it.", 2),
                ],
            ),
            q(
                "A teammate shares an AI primer course.",
                [
                    opt("Save the link for someday.", 2),
                    opt("Enroll and set a completion date this week.", 5),
                    opt("Skim only the first lesson.", 3),
                    opt("Decline because courses slow you down.", 1),
                ],
            ),
            q(
                "You are asked about your openness to AI-led change.",
                [
                    opt("Prefer no change to workflows.", 1),
                    opt("Open to change and willing to learn quickly.", 5),
                    opt("Okay with change if fully documented.", 3),
                    opt("Resistant unless mandated.", 2),
                ],
            ),
        ],
    },
    Category {
        key: "curiosity",
        name: "Digital Curiosity",
        weight: 15,
        questions: [
            q(
                "When you hear about a new app that could improve productivity, what best describes you?",
                [
                    opt("I immediately look it up and try it on a low-risk task.", 5),
                    opt("I wait until others have tried it and use it if it becomes common.", 3),
                    opt("I stick with the tools I already know.", 2),
                    opt("I feel anxious about new tools and avoid them unless required.", 1),
                ],
            ),
            q(
                "A new productivity extension promises AI email drafting.",
                [
                    opt("Install and A/B test on low-risk emails.", 5),
                    opt("Wait for team adoption first.", 3),
                    opt("Ignore because you have a template already.", 2),
                    opt("Avoid extensions entirely.", 1),
                ],
            ),
            q(
                "Your main tool ships a major update with release notes.",
                [
                    opt("Ignore release notes; keep doing things the old way.", 1),
                    opt("Skim and share a relevant tip with the team.", 5),
                    opt("Wait for others to summarize later.", 3),
                    opt("Disable updates until forced.", 1),
                ],
            ),
            q(
                "You hear about a tool that summarizes calls automatically.",
                [
                    opt("Pilot it in one internal meeting.", 5),
                    opt("Bookmark for later review.", 3),
                    opt("Ask someone else to read reviews.", 2),
                    opt("Assume it's hype and move on.", 1),
                ],
            ),
            q(
                "You come across an AI article relevant to your role.",
                [
                    opt("Share a short take with your team channel.", 5),
                    opt("Save it privately.", 3),
                    opt("Skim headline only.", 2),
                    opt("Ignore.", 1),
                ],
            ),
        ],
    },
    Category {
        key: "process",
        name: "Process Thinking",
        weight: 20,
        questions: [
            q(
                "You inherit a 12-step manual workflow.",
                [
                    opt("Document it as-is and continue.", 2),
                    opt("Map steps, group by function, and flag automation candidates.", 5),
                    opt("Ask someone else how they'd do it.", 2),
                    opt("Skip mapping and start executing.", 1),
                ],
            ),
            q(
                "Deadlines are tight on a repetitive task.",
                [
                    opt("Work longer hours to keep up.", 2),
                    opt("Batch tasks and explore an AI template.", 5),
                    opt("Delegate without changing the process.", 3),
                    opt("Push deadlines out.", 1),
                ],
            ),
            q(
                "Two teams duplicate data entry in two tools.",
                [
                    opt("Accept duplication to avoid change risk.", 2),
                    opt("Propose an integration/connector and RACI with SLAs.", 5),
                    opt("Export/import manually weekly.", 3),
                    opt("Let each team manage separately.", 1),
                ],
            ),
            q(
                "Error rate increases on a manual QA task.",
                [
                    opt("Add a second human reviewer.", 3),
                    opt("Introduce an AI checker with human spot-audits.", 5),
                    opt("Accept minor errors to move faster.", 1),
                    opt("Pause the task indefinitely.", 1),
                ],
            ),
            q(
                "A request spans multiple teams and tools.",
                [
                    opt("Handle by email CCs.", 2),
                    opt("Create a shared workflow diagram and RACI.", 5),
                    opt("Ask manager to coordinate.", 3),
                    opt("Let each team manage their part separately.", 1),
                ],
            ),
        ],
    },
    Category {
        key: "literacy",
        name: "AI Literacy (Baseline)",
        weight: 10,
        questions: [
            q(
                "Which statement best describes your experience with ChatGPT or Google Gemini?",
                [
                    opt("I regularly use them (writing, research, brainstorming) and can guide with prompts.", 5),
                    opt("I’ve tried them a few times for simple queries.", 3),
                    opt("I’ve heard of them but haven’t really used them.", 2),
                    opt("I don’t trust or see a use for them in my work.", 1),
                ],
            ),
            q(
                "Best practice for prompting?",
                [
                    opt("Give one vague sentence.", 1),
                    opt("Provide role, goal, constraints, examples, and format.", 5),
                    opt("Ask the model to “figure it out.”", 2),
                    opt("Paste everything you have without structure.", 2),
                ],
            ),
            q(
                "Handling sensitive client data with AI:",
                [
                    opt("Paste raw data into any chatbot.", 1),
                    opt("Redact and use a company-approved, access-controlled environment.", 5),
                    opt("Use a personal account for convenience.", 1),
                    opt("Avoid AI even when a safe option exists.", 2),
                ],
            ),
            q(
                "Selecting tools for a task:",
                [
                    opt("Use one general model for everything.", 2),
                    opt("Choose tools/models based on task (text, vision, agents, automation).", 5),
                    opt("Pick the cheapest option only.", 2),
                    opt("Wait for IT to assign.", 3),
                ],
            ),
            q(
                "What does good AI output verification look like?",
                [
                    opt("Trust the first result.", 1),
                    opt("Cross-check sources and test edge cases before using.", 5),
                    opt("Ask a friend if it seems fine.", 2),
                    opt("Rerun the same prompt once.", 2),
                ],
            ),
        ],
    },
    Category {
        key: "problem",
        name: "Problem-Solving Ability",
        weight: 15,
        questions: [
            q(
                "You must analyze an unfamiliar dataset by end of day.",
                [
                    opt("Clarify goals, break into parts, and use AI to suggest methods or summaries.", 5),
                    opt("Break it down and do manual analysis only in Excel.", 3),
                    opt("Ask a supervisor to handle it since it’s new.", 2),
                    opt("Avoid AI tools and search the web for hours.", 2),
                ],
            ),
            q(
                "A solution fails in testing.",
                [
                    opt("Abandon the approach entirely.", 1),
                    opt("Collect logs, isolate variables, iterate with small changes.", 5),
                    opt("Ask another team to take over.", 2),
                    opt("Ship anyway if it works sometimes.", 1),
                ],
            ),
            q(
                "You need to prioritize multiple tasks.",
                [
                    opt("Do easiest first.", 2),
                    opt("Use impact/effort matrix and deadlines to order work.", 5),
                    opt("Pick what you like most.", 2),
                    opt("Ask someone else to decide.", 3),
                ],
            ),
            q(
                "A recurring defect slips into production.",
                [
                    opt("Create a checklist and an AI guardrail to catch it.", 5),
                    opt("Remind people to be careful.", 2),
                    opt("Assign blame.", 1),
                    opt("Delay releases indefinitely.", 1),
                ],
            ),
            q(
                "Stakeholders disagree on requirements.",
                [
                    opt("Proceed with your interpretation.", 2),
                    opt("Facilitate a brief alignment doc and review.", 5),
                    opt("Wait until they agree.", 2),
                    opt("Build two versions.", 1),
                ],
            ),
        ],
    },
    Category {
        key: "communication",
        name: "Communication Skills",
        weight: 15,
        questions: [
            q(
                "Explaining an AI workflow to a non-technical client looks like…",
                [
                    opt("Use jargon; they'll learn.", 1),
                    opt("Use plain language, diagrams, and a short example.", 5),
                    opt("Send a long whitepaper.", 2),
                    opt("Ask someone else to present.", 1),
                ],
            ),
            q(
                "Handing off a process to a teammate requires…",
                [
                    opt("Explain verbally once.", 2),
                    opt("A concise SOP with screenshots/templates.", 5),
                    opt("A long video without chapters.", 2),
                    opt("Let them figure it out.", 1),
                ],
            ),
            q(
                "A client questions AI accuracy; you…",
                [
                    opt("Get defensive.", 1),
                    opt("Acknowledge limits; describe controls and QC steps.", 5),
                    opt("Say it's perfect now.", 1),
                    opt("Avoid answering.", 1),
                ],
            ),
            q(
                "Proposing automation changes, you provide…",
                [
                    opt("Only the idea.", 2),
                    opt("Before/after metrics and a rollout plan.", 5),
                    opt("A meme.", 1),
                    opt("Ask manager to sell it.", 2),
                ],
            ),
            q(
                "Presenting to executives vs. engineers, you…",
                [
                    opt("Reuse one deck for speed.", 2),
                    opt("Tailor outcomes/risks for execs and technical steps for engineers.", 5),
                    opt("Send a long whitepaper to both.", 1),
                    opt("Rely on jargon for speed.", 1),
                ],
            ),
        ],
    },
    Category {
        key: "growth",
        name: "Growth Mindset",
        weight: 10,
        questions: [
            q(
                "You receive constructive feedback on your AI prompts.",
                [
                    opt("Defend your approach.", 1),
                    opt("Thank them and iterate on a new version.", 5),
                    opt("Ignore unless mandated.", 2),
                    opt("Ask them to write the prompts instead.", 2),
                ],
            ),
            q(
                "A pilot fails to reach expected ROI.",
                [
                    opt("Cancel AI initiatives.", 1),
                    opt("Run a retro; adjust scope and try again.", 5),
                    opt("Hide the results.", 1),
                    opt("Blame the tool.", 1),
                ],
            ),
            q(
                "You're assigned a stretch learning goal (e.g., Level 2 → 3).",
                [
                    opt("Decline due to workload.", 1),
                    opt("Create a learning plan with milestones.", 5),
                    opt("Skim a video and call it done.", 2),
                    opt("Ask to postpone indefinitely.", 1),
                ],
            ),
            q(
                "A colleague shares a better workflow you didn't know.",
                [
                    opt("Ignore to avoid rework.", 1),
                    opt("Adopt it and credit them in the SOP.", 5),
                    opt("Use it silently.", 3),
                    opt("Argue the old way is fine.", 1),
                ],
            ),
            q(
                "You're asked to mentor a junior on AI basics.",
                [
                    opt("Decline; not your job.", 1),
                    opt("Share resources and review their first attempts.", 5),
                    opt("Point them to a link only.", 2),
                    opt("Tell them to ask someone else.", 1),
                ],
            ),
        ],
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn weights_sum_to_one_hundred() {
        let total: u32 = CATEGORIES.iter().map(|c| c.weight as u32).sum();
        assert_eq!(total, 100);
    }

    #[test]
    fn every_option_scores_between_one_and_five() {
        for cat in &CATEGORIES {
            for question in &cat.questions {
                for option in &question.options {
                    assert!(
                        (1..=MAX_POINTS).contains(&option.points),
                        "{}: '{}' has {} points",
                        cat.key,
                        option.text,
                        option.points
                    );
                }
            }
        }
    }

    #[test]
    fn every_question_offers_a_full_score_option() {
        for cat in &CATEGORIES {
            for question in &cat.questions {
                assert!(question.options.iter().any(|o| o.points == MAX_POINTS));
            }
        }
    }

    #[test]
    fn keys_are_unique_and_resolvable() {
        let keys: HashSet<&str> = CATEGORIES.iter().map(|c| c.key).collect();
        assert_eq!(keys.len(), CATEGORIES.len());
        assert_eq!(category("process").map(|c| c.weight), Some(20));
        assert_eq!(category_index("growth"), Some(6));
        assert!(category("nope").is_none());
    }

    #[test]
    fn totals() {
        assert_eq!(TOTAL_QUESTIONS, 35);
        assert_eq!(MAX_RAW, 25);
    }
}
