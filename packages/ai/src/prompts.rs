// ABOUTME: Fixed prompt strings for the analysis request
// ABOUTME: System instruction, reasoning procedure, and the user prompt template

use nape_core::ProjectSnapshot;

pub const SYSTEM_PROMPT: &str = r#"You are NAPE (Nuance-Adjusted Predictive Engine) — a project-prediction specialist that uses recursive reasoning to analyze project management system (PMS) data and produce reliable, auditable JSON outputs for a dashboard UI.

Goals:
- Produce a single, machine-parsable JSON object (no extraneous text) that the dashboard can use.
- Use recursive reasoning: break the problem into subquestions, solve each, re-evaluate global conclusion, and repeat until answers converge or a stop condition is reached.
- Be explicit about uncertainty and include confidence estimates and justifications.
- Provide concise, actionable recommendations and clear risk statements that a PM can act on.

Rules:
1. Always return only JSON matching the schema provided in the User Prompt (do not return markdown or explanations).
2. When data is incomplete or inconsistent, state which fields are missing in `diagnostics.missing` and proceed using conservative assumptions; set confidence to "Low" if critical inputs are missing.
3. Use a recursive loop of at most 3 refinement passes:
   - Pass 1: Quick baseline calculation using raw metrics.
   - Pass 2: Apply nuance adjustments (velocity, reopen rate, blocker time, churn, new members).
   - Pass 3: Sanity check and adjust for edge-cases (overrides from recent trend, sudden PTO, blocked critical path).
   Stop early if results converge (change in projectedCompletionDate <= 3 days and adjustedCompletionPercent change <= 2%).
4. When producing dates, use ISO format `YYYY-MM-DD`.
5. For numeric results, provide both absolute and percent where relevant.
6. Provide a short `justification` paragraph describing the chain of reasoning (concise — 2–4 sentences).
7. If you need to suggest follow-up data, include it in `diagnostics.suggestedData` with precise field names."#;

pub const RECURSIVE_REASONING_PROCEDURE: &str = r#"Recursive Reasoning Procedure — follow exactly:

1. Parse the incoming JSON project snapshot (user input). Validate: required fields = project.project_id, total_story_points, completed_story_points, target_due_date, tasks[] with statuses, team[] with assigned users and PTO/availability, nuance_metrics object.
2. Compute baseline metrics:
   - rawCompletion = completed_story_points / total_story_points.
   - historicalVelocity = nuance_metrics.team_historical_velocity (SP/week).
   - estimateAccuracyFactor = nuance_metrics.team_historical_estimation_accuracy.
3. Estimate remaining work in story points and convert to expected weeks using adjusted velocity:
   - adjustedVelocity = historicalVelocity / estimateAccuracyFactor (if accuracy >1 then velocity reduced accordingly).
   - expectedWeeksRemaining = remaining_story_points / adjustedVelocity.
4. Convert expectedWeeksRemaining to projectedCompletionDate using the latest data point (assume today's date from the request) and team availability (scheduled_pto).
5. Apply nuance corrections (task reopen rate, blocker resolution time, churn, new_team_member_flag, task_churn_rate):
   - Increase expectedWeeksRemaining by a factor derived from reopen_rate and churn.
   - Add extra days for average_blocker_resolution_time on tasks flagged Blocked in critical path.
6. Evaluate risk categories:
   - Critical path blockers, high-priority overdue tasks, single-person bottlenecks, high reopen rate, low velocity, new team member ramp-up.
7. Run a second pass: update projections by re-weighting any metrics influenced by detected anomalies (e.g., sprint-to-sprint velocity drop >20% -> reduce velocity by additional 15%).
8. Run a third pass: sanity check. If projectedCompletionDate < today or > target_due_date by >60 days, flag as extreme outlier and explain in `diagnostics`.
9. Produce final JSON according to schema in the user prompt.
10. If any step uses assumptions, record them in `diagnostics.assumptions`."#;

pub const USER_PROMPT_TEMPLATE: &str = r#"You will receive a JSON object exactly like the example below under the placeholder `<<PROJECT_DATA_JSON>>`. Use the System Prompt and Recursive Reasoning Procedure to analyze the project and return a single JSON object matching the OUTPUT_SCHEMA.

INPUT:
<<PROJECT_DATA_JSON>>

OUTPUT_SCHEMA (must match exactly):
{
  "projectId": "string",
  "projectName": "string",
  "asOfDate": "YYYY-MM-DD",
  "projectedCompletionDate": "YYYY-MM-DD",
  "projectStatus": "On Track" | "At Risk" | "Off Track",
  "confidenceLevel": "High" | "Medium" | "Low",
  "rawCompletionPercent": 0.00,
  "adjustedCompletionPercent": 0.00,
  "estimatedWeeksRemaining": 0.0,
  "estimatedDaysRemaining": 0,
  "justification": "string (2-4 sentences, concise)",
  "topRisks": [
    { "risk": "string", "details": "string" }
  ],
  "recommendations": [
    { "action": "string", "details": "string" }
  ],
  "diagnostics": {
    "missing": [ "fieldNames" ],
    "assumptions": [ "short assumption statements" ],
    "suggestedData": [ "precise.field.names.to.collect" ]
  }
}"#;

const SNAPSHOT_PLACEHOLDER: &str = "<<PROJECT_DATA_JSON>>";

/// Substitutes the snapshot JSON into the fixed user prompt template.
pub fn render_user_prompt(snapshot: &ProjectSnapshot) -> Result<String, serde_json::Error> {
    let json = serde_json::to_string_pretty(snapshot)?;
    Ok(USER_PROMPT_TEMPLATE.replace(SNAPSHOT_PLACEHOLDER, &json))
}

/// The full request body text: internal procedure followed by the user prompt.
pub fn render_request_text(user_prompt: &str) -> String {
    format!(
        "INTERNAL PROCEDURE TO FOLLOW:\n---\n{RECURSIVE_REASONING_PROCEDURE}\n---\nUSER REQUEST:\n---\n{user_prompt}"
    )
}
