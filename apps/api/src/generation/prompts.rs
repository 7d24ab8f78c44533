//! Prompt Builder: one template per report section.
//!
//! Templates list only the input fields relevant to their section, spell out
//! the exact JSON shape expected back, state item-count and length limits, and
//! end with a JSON-only instruction. Building is pure string substitution: no
//! randomness, no I/O, and the input is only borrowed.
//!
//! A field left empty by the caller is embedded as an empty string. Validation
//! upstream is what keeps that from reaching the provider.

use crate::generation::sections::SectionKind;
use crate::llm_client::prompts::JSON_OBJECT_ONLY;
use crate::models::report::ReportInputData;

/// Separator used when a list field is embedded inline.
const LIST_SEPARATOR: &str = "、";
/// Embedded for a special-circumstance flag that is not set.
const NONE_MARKER: &str = "无";

/// Personality analysis. Replace: {name}, {grade}, {performance},
/// {personality_type}, {interests}, {subjects}, {strengths}, {weaknesses}, {json_only}
pub const PERSONALITY_PROMPT_TEMPLATE: &str = r#"
你是一位专业的生涯规划顾问，请基于以下学生信息生成详细的性格测评分析：

学生信息：
- 姓名：{name}
- 年级：{grade}
- 成绩水平：{performance}
- 人格类型：{personality_type}
- 兴趣倾向：{interests}
- 学科优势：{subjects}

已有的性格特质：
优势：{strengths}
劣势：{weaknesses}

请生成JSON格式的性格分析报告：
{
  "coreType": "人格核心类型的详细描述（如：战略规划型 - 具有卓越的逻辑分析能力和长远眼光）",
  "strengths": ["性格优势1（具体描述，避免空泛）", "性格优势2", "性格优势3", "性格优势4"],
  "weaknesses": ["性格缺点1（具体描述）", "性格缺点2", "性格缺点3"],
  "summary": ["思维模式描述1", "行为特点描述2", "核心特质总结3"]
}

要求：
1. 优势和劣势各至少3点，内容具体，避免"性格开朗"等空泛表述
2. 思维模式/行为特点至少3句话
3. 贴合{personality_type}人格类型的特征
4. {json_only}
"#;

/// Career matches. Replace: {personality_type}, {strengths}, {interests},
/// {subjects}, {target_degree}, {career_expectation}, {location_preference}, {json_only}
pub const CAREER_MATCHES_PROMPT_TEMPLATE: &str = r#"
你是一位专业的职业规划顾问，请基于以下学生信息生成职业适配分析：

学生信息：
- 人格类型：{personality_type}
- 性格优势：{strengths}
- 兴趣倾向：{interests}
- 学科优势：{subjects}
- 目标学历：{target_degree}
- 家庭就业期望：{career_expectation}
- 地域偏好：{location_preference}

请推荐3类核心职业方向，每类3-5个具体岗位，返回JSON对象：
{
  "careers": [
    {
      "direction": "职业方向1（如：金融投资领域）",
      "positions": ["岗位1", "岗位2", "岗位3", "岗位4"],
      "matchReason": "适配原因（不超过20字）"
    },
    {
      "direction": "职业方向2",
      "positions": ["岗位1", "岗位2", "岗位3"],
      "matchReason": "适配原因"
    },
    {
      "direction": "职业方向3",
      "positions": ["岗位1", "岗位2", "岗位3"],
      "matchReason": "适配原因"
    }
  ]
}

要求：
1. 职业方向要具体且与人格特质匹配
2. 岗位要具体可落地（如：金融分析师、产品经理、数据科学家等）
3. 适配原因简洁有力，不超过20字
4. {json_only}
"#;

/// Planning advice. Replace: {name}, {grade}, {performance}, {target_degree},
/// {personality_type}, {family_structure}, {parent_occupation}, {budget},
/// {resources}, {education_goal}, {career_expectation}, {location_preference},
/// {academic_issues}, {special_planning}, {resource_gaps}, {json_only}
pub const PLANNING_ADVICE_PROMPT_TEMPLATE: &str = r#"
你是一位专业的生涯规划顾问，请基于以下学生和家庭信息生成咨询规划建议：

学生信息：
- 姓名：{name}
- 年级：{grade}
- 成绩水平：{performance}
- 目标学历：{target_degree}
- 人格类型：{personality_type}

家庭信息：
- 家庭结构：{family_structure}
- 父母职业：{parent_occupation}
- 经济预算：{budget}
- 家庭资源：{resources}
- 升学目标：{education_goal}
- 就业期望：{career_expectation}
- 地域偏好：{location_preference}

特殊情况：
- 考学问题：{academic_issues}
- 特色规划：{special_planning}
- 资源缺乏：{resource_gaps}

请生成JSON格式的规划建议：
{
  "developmentPaths": [
    {
      "educationDirection": "升学方向（如：冲刺985/211院校计算机专业）",
      "careerGoal": "职业目标（如：互联网大厂产品经理）",
      "resourceMatch": "资源适配（如：利用家庭金融行业人脉进行背景提升）"
    },
    {"educationDirection": "...", "careerGoal": "...", "resourceMatch": "..."},
    {"educationDirection": "...", "careerGoal": "...", "resourceMatch": "..."}
  ],
  "careerAdvice": [
    {
      "field": "就业领域1（如：互联网科技）",
      "shortTermPath": "短期路径（1-2句）",
      "longTermPath": "长期路径（1-2句）"
    },
    {"field": "...", "shortTermPath": "...", "longTermPath": "..."},
    {"field": "...", "shortTermPath": "...", "longTermPath": "..."}
  ],
  "familyCooperationAdvice": [
    "家庭需调整/强化的方向1（具体可落地）",
    "家庭需调整/强化的方向2"
  ]
}

要求：
1. 发展路径3条，逻辑清晰，升学-职业-资源三者关联
2. 职业建议3个领域，短期和长期路径具体可落地
3. 家庭配合建议1-2条，具体可落地
4. {json_only}
"#;

/// Education projects. Replace: {grade}, {performance}, {target_degree},
/// {budget}, {education_goal}, {location_preference}, {json_only}
pub const EDUCATION_PROJECTS_PROMPT_TEMPLATE: &str = r#"
你是一位专业的升学规划顾问，请基于以下学生信息推荐升学项目：

学生信息：
- 年级：{grade}
- 成绩水平：{performance}
- 目标学历：{target_degree}
- 经济预算：{budget}
- 升学目标：{education_goal}
- 地域偏好：{location_preference}

请推荐6-8个升学项目，覆盖以下3类：
1. 升学类（国内提分营/中外合作办学/留学项目）- 推荐2-3个
2. 背景提升类（名企实习/科研项目）- 推荐2-3个
3. 兜底类（成人本科/专科+硕士）- 推荐2个

返回JSON对象：
{
  "projects": [
    {
      "name": "项目名称（如：香港副学士转学士项目）",
      "tuitionRange": "学费范围（如：15-25万/年）",
      "advantages": ["优势1", "优势2"],
      "disadvantages": ["劣势1", "劣势2"],
      "recommendIndex": 4,
      "consultingFeeRange": "咨询费范围（如：3-5万）",
      "category": "升学类",
      "principle": "项目原理（学习模式/培养目标）",
      "requirements": "录取要求（学历/语言/成绩等）",
      "timeline": "时间节点（报名/入学/毕业关键时间）",
      "process": "流程（报名-审核-录取-入学）"
    }
  ]
}

项目参考：
- 升学类：香港副学士、3+1国际本科、新加坡公立大学、澳洲八大预科、985强基计划
- 背景提升：四大会计师事务所实习、互联网大厂实习、名校教授科研项目
- 兜底类：成人本科、国内专升本、国外专升硕

要求：
1. 每个项目信息完整，包含所有字段
2. 推荐指数为1-5的整数，根据学生情况给出合理评分
3. category 只能是"升学类"、"背景提升类"、"兜底类"之一
4. 项目需真实存在，信息准确
5. 根据学生预算和目标合理推荐
6. {json_only}
"#;

/// Timeline. Replace: {grade}, {target_degree}, {education_goal},
/// {planning_scope}, {json_only}
pub const TIMELINE_PROMPT_TEMPLATE: &str = r#"
你是一位专业的升学规划顾问，请为以下学生制定详细的申请时间表：

学生信息：
- 年级：{grade}
- 目标学历：{target_degree}
- 升学目标：{education_goal}
- 规划范围：{planning_scope}

请按阶段生成时间规划，返回JSON对象：
{
  "timeline": [
    {
      "stage": "阶段名称（如：高一上学期）",
      "time": "具体时间（如：9月-次年1月）",
      "tasks": ["核心任务1", "核心任务2", "核心任务3"],
      "notes": "注意事项"
    }
  ]
}

要求：
1. 覆盖从当前年级到目标学历的完整规划
2. 每个阶段包含3-5个核心任务
3. 任务具体可执行（如：完成60学时志愿者服务、报名雅思考试）
4. 注意事项要具体有用
5. 至少包含8-12个阶段
6. {json_only}
"#;

/// Supply-chain projects. Replace: {grade}, {target_degree}, {interests},
/// {career_expectation}, {json_only}
pub const SUPPLY_CHAIN_PROMPT_TEMPLATE: &str = r#"
你是一位专业的教育资源顾问，请为以下学生推荐供应链项目：

学生信息：
- 年级：{grade}
- 目标学历：{target_degree}
- 兴趣倾向：{interests}
- 就业期望：{career_expectation}

请推荐以下4类项目，每类2-3个，返回JSON对象：
{
  "projects": [
    {
      "category": "语言培训",
      "name": "项目名称（如：雅思1v1保分班）",
      "description": "项目描述",
      "advantage": "服务优势（不超过20字）"
    }
  ]
}

项目类别要求：
1. 语言培训：雅思/托福1v1辅导、多邻国培训、小语种培训等
2. 游学研学：剑桥/牛津暑期营、清北复交研学营、文化体验营等
3. 实习项目：四大会计师事务所、腾讯/阿里/字节等互联网大厂、中金/中信等金融机构
4. 科研/赛事：白名单赛事辅导、名校教授1v1科研、论文发表辅导等

要求：
1. 每类2-3个项目，共8-12个
2. category 只能是"语言培训"、"游学研学"、"实习项目"、"科研/赛事"之一
3. 项目名称具体真实
4. 服务优势简洁有力，不超过20字
5. {json_only}
"#;

/// Summary. Replace: {name}, {grade}, {personality_type}, {target_degree},
/// {education_goal}, {career_expectation}, {json_only}
pub const SUMMARY_PROMPT_TEMPLATE: &str = r#"
你是一位专业的生涯规划顾问，请为以下学生生成报告总结：

学生信息：
- 姓名：{name}
- 年级：{grade}
- 人格类型：{personality_type}
- 目标学历：{target_degree}
- 升学目标：{education_goal}
- 就业期望：{career_expectation}

请生成JSON格式的总结：
{
  "planningLogic": "整体规划逻辑（测评-适配-项目-执行的完整逻辑，3-4句话）",
  "coreCompetence": "学生核心竞争力提炼（2-3句话，突出个人优势）",
  "actionSuggestions": [
    "后续行动建议1（具体可执行）",
    "后续行动建议2",
    "后续行动建议3",
    "后续行动建议4"
  ],
  "serviceCommitment": [
    "机构服务承诺1（如：一站式资源对接）",
    "机构服务承诺2（如：全程跟踪辅导）",
    "机构服务承诺3"
  ]
}

要求：
1. 规划逻辑清晰，体现专业性
2. 核心竞争力贴合学生个人情况
3. 行动建议至少3条，具体可落地
4. 结尾需有鼓励性表述
5. {json_only}
"#;

/// Builds the instruction string for one section from the questionnaire.
pub fn build_prompt(kind: SectionKind, input: &ReportInputData) -> String {
    let student = &input.student_info;
    let assessment = &input.assessment_data;
    let family = &input.family_info;
    let demands = &family.demands;
    let special = &input.special_circumstances;

    let grade = student.grade.label();
    let performance = student.current_performance.to_string();
    let target_degree = student.target_degree.to_string();
    let interests = assessment.interest_tendency.join(LIST_SEPARATOR);
    let subjects = assessment.subject_strengths.join(LIST_SEPARATOR);
    let strengths = assessment.personality_traits.strengths.join(LIST_SEPARATOR);

    match kind {
        SectionKind::PersonalityAnalysis => fill_template(
            PERSONALITY_PROMPT_TEMPLATE,
            &[
                ("name", student.name.as_str()),
                ("grade", grade),
                ("performance", performance.as_str()),
                ("personality_type", assessment.personality_type.as_str()),
                ("interests", interests.as_str()),
                ("subjects", subjects.as_str()),
                ("strengths", strengths.as_str()),
                (
                    "weaknesses",
                    assessment
                        .personality_traits
                        .weaknesses
                        .join(LIST_SEPARATOR)
                        .as_str(),
                ),
                ("json_only", JSON_OBJECT_ONLY),
            ],
        ),
        SectionKind::CareerMatches => fill_template(
            CAREER_MATCHES_PROMPT_TEMPLATE,
            &[
                ("personality_type", assessment.personality_type.as_str()),
                ("strengths", strengths.as_str()),
                ("interests", interests.as_str()),
                ("subjects", subjects.as_str()),
                ("target_degree", target_degree.as_str()),
                ("career_expectation", demands.career_expectation.as_str()),
                ("location_preference", demands.location_preference.as_str()),
                ("json_only", JSON_OBJECT_ONLY),
            ],
        ),
        SectionKind::PlanningAdvice => fill_template(
            PLANNING_ADVICE_PROMPT_TEMPLATE,
            &[
                ("name", student.name.as_str()),
                ("grade", grade),
                ("performance", performance.as_str()),
                ("target_degree", target_degree.as_str()),
                ("personality_type", assessment.personality_type.as_str()),
                ("family_structure", family.structure.as_str()),
                ("parent_occupation", family.parent_occupation.as_str()),
                ("budget", family.budget.as_str()),
                ("resources", family.resources.join(LIST_SEPARATOR).as_str()),
                ("education_goal", demands.education_goal.as_str()),
                ("career_expectation", demands.career_expectation.as_str()),
                ("location_preference", demands.location_preference.as_str()),
                (
                    "academic_issues",
                    special.academic_issues().unwrap_or(NONE_MARKER),
                ),
                (
                    "special_planning",
                    special.special_planning().unwrap_or(NONE_MARKER),
                ),
                ("resource_gaps", special.resource_gaps().unwrap_or(NONE_MARKER)),
                ("json_only", JSON_OBJECT_ONLY),
            ],
        ),
        SectionKind::EducationProjects => fill_template(
            EDUCATION_PROJECTS_PROMPT_TEMPLATE,
            &[
                ("grade", grade),
                ("performance", performance.as_str()),
                ("target_degree", target_degree.as_str()),
                ("budget", family.budget.as_str()),
                ("education_goal", demands.education_goal.as_str()),
                ("location_preference", demands.location_preference.as_str()),
                ("json_only", JSON_OBJECT_ONLY),
            ],
        ),
        SectionKind::Timeline => fill_template(
            TIMELINE_PROMPT_TEMPLATE,
            &[
                ("grade", grade),
                ("target_degree", target_degree.as_str()),
                ("education_goal", demands.education_goal.as_str()),
                ("planning_scope", student.grade.planning_scope()),
                ("json_only", JSON_OBJECT_ONLY),
            ],
        ),
        SectionKind::SupplyChainProjects => fill_template(
            SUPPLY_CHAIN_PROMPT_TEMPLATE,
            &[
                ("grade", grade),
                ("target_degree", target_degree.as_str()),
                ("interests", interests.as_str()),
                ("career_expectation", demands.career_expectation.as_str()),
                ("json_only", JSON_OBJECT_ONLY),
            ],
        ),
        SectionKind::Summary => fill_template(
            SUMMARY_PROMPT_TEMPLATE,
            &[
                ("name", student.name.as_str()),
                ("grade", grade),
                ("personality_type", assessment.personality_type.as_str()),
                ("target_degree", target_degree.as_str()),
                ("education_goal", demands.education_goal.as_str()),
                ("career_expectation", demands.career_expectation.as_str()),
                ("json_only", JSON_OBJECT_ONLY),
            ],
        ),
    }
}

/// Substitutes `{key}` slots in a single left-to-right pass. Substituted text
/// is never rescanned, so answers that contain braces are embedded verbatim.
/// Braces that do not name a slot (the JSON shape examples) are copied through.
fn fill_template(template: &str, slots: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let slot = after.find('}').and_then(|close| {
            let key = &after[..close];
            slots
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (close, *value))
        });
        match slot {
            Some((close, value)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}
