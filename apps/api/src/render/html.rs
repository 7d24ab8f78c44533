//! HTML Renderer: report document to a self-contained, print-ready page set.
//!
//! The document is a fixed list of ten A4 pages:
//!
//! 1. cover
//! 2. institution introduction
//! 3. personality assessment
//! 4. career matches and family analysis
//! 5. planning advice
//! 6. education project table
//! 7. education project details, grouped by category
//! 8. timeline
//! 9. supply-chain resources, grouped by category
//! 10. summary
//!
//! Rendering is a pure structural mapping: every collection in the document
//! becomes one element per item, in array order. All text taken from the
//! document is escaped. Output depends on nothing but the input, so rendering
//! the same report twice yields identical bytes.

use std::fmt::Write as _;

use crate::models::report::{
    EducationCategory, EducationProject, FullReportData, SupplyChainCategory, SupplyChainProject,
};
use crate::render::report_local_time;
use crate::render::theme::{COLORS, INSTITUTION};

const FILLED_STAR: char = '★';
const EMPTY_STAR: char = '☆';
const MAX_STARS: i32 = 5;

/// Stylesheet. Replace: {primary}, {secondary}, {accent}, {light_bg}, {text}
const STYLESHEET_TEMPLATE: &str = r#"
@page { size: A4; margin: 0; }
* { box-sizing: border-box; margin: 0; padding: 0; }
body { font-family: "Microsoft YaHei", "Source Han Sans", "SimHei", sans-serif; color: {text}; font-size: 10pt; line-height: 1.5; }
.page { width: 210mm; min-height: 297mm; padding: 20mm; page-break-after: always; position: relative; background: white; }
.page:last-child { page-break-after: avoid; }
.page-tinted { background: {light_bg}; }
.page-number { position: absolute; bottom: 10mm; left: 50%; transform: translateX(-50%); color: {primary}; font-size: 9pt; }
h1 { color: {primary}; font-size: 22pt; font-weight: bold; text-align: center; margin-bottom: 20pt; }
h2 { color: {primary}; font-size: 14pt; font-weight: bold; margin-bottom: 10pt; padding-bottom: 6pt; border-bottom: 2px solid {accent}; }
h3 { color: {secondary}; font-size: 11pt; font-weight: bold; margin-bottom: 8pt; }
h4 { color: {primary}; font-size: 10pt; margin-bottom: 8pt; }
table { width: 100%; border-collapse: collapse; margin: 10pt 0; font-size: 9pt; }
table.compact { font-size: 8pt; }
th { background-color: {primary}; color: white; padding: 8pt; text-align: left; }
td { padding: 6pt 8pt; border-bottom: 0.5pt solid {accent}; }
tr:nth-child(even) td { background-color: {light_bg}; }
td.key { font-weight: bold; color: {primary}; }
td.stars { text-align: center; color: {secondary}; font-weight: bold; font-size: 10pt; }
td.muted { color: #666; }
.card { background: white; border: 1pt solid {accent}; border-radius: 6pt; padding: 12pt; margin-bottom: 10pt; }
.tag { display: inline-block; padding: 3pt 8pt; background: {accent}; color: {primary}; border-radius: 10pt; font-size: 8pt; margin: 2pt; }
.tag-outline { background: white; border: 1pt solid {secondary}; }
.chip { display: inline-block; padding: 5pt 10pt; background: {light_bg}; color: {secondary}; border-radius: 4pt; font-size: 9pt; font-weight: bold; }
.task { display: inline-block; padding: 3pt 6pt; border-radius: 3pt; margin: 2pt; border: 0.5pt solid {accent}; background: white; }
.task-alt { background: {light_bg}; }
.bullet-item { padding-left: 16pt; position: relative; margin-bottom: 5pt; }
.bullet-item::before { content: "•"; position: absolute; left: 5pt; color: {accent}; }
.section { margin-bottom: 16pt; }
.flex-grid { display: flex; flex-wrap: wrap; gap: 8pt; }
.grid-2 { display: grid; grid-template-columns: repeat(2, 1fr); gap: 10pt; }
.grid-3 { display: grid; grid-template-columns: repeat(3, 1fr); gap: 10pt; }
.strength-item { padding: 8pt 10pt; background: #E8F5E9; border-radius: 4pt; border-left: 3pt solid #4CAF50; font-size: 9pt; }
.weakness-item { padding: 8pt 10pt; background: #FFF3E0; border-radius: 4pt; border-left: 3pt solid #FF9800; font-size: 9pt; }
.highlight-box { background: linear-gradient(135deg, {primary}, {secondary}); color: white; padding: 14pt; border-radius: 6pt; text-align: center; }
.info-box { background: {light_bg}; padding: 12pt; border-radius: 6pt; border-left: 3pt solid {primary}; }
.tinted-box { background: {light_bg}; padding: 14pt; border-radius: 6pt; }
.lead { color: #666; margin-bottom: 12pt; font-size: 9pt; }
.label { color: #999; margin-bottom: 2pt; }
.emphasis { color: {secondary}; font-weight: bold; }
.badge { width: 24pt; height: 24pt; background: {primary}; color: white; border-radius: 50%; display: flex; align-items: center; justify-content: center; font-weight: bold; flex-shrink: 0; margin-right: 10pt; }
.badge-soft { background: {secondary}; }
.row { display: flex; align-items: center; gap: 10pt; }
.card-head { display: flex; align-items: center; margin-bottom: 10pt; }
.reason { font-size: 8pt; color: {secondary}; margin-top: 2pt; }
.service { background: white; padding: 14pt; border-radius: 6pt; text-align: center; box-shadow: 0 2pt 6pt rgba(0,0,0,0.08); }
.service p { font-weight: bold; color: {primary}; }
.service .badge { width: 35pt; height: 35pt; margin: 0 auto 8pt; font-size: 14pt; background: linear-gradient(135deg, {primary}, {secondary}); }
.path { display: flex; margin-bottom: 10pt; background: white; border-radius: 6pt; overflow: hidden; box-shadow: 0 2pt 6pt rgba(0,0,0,0.06); }
.path-index { width: 35pt; background: linear-gradient(180deg, {primary}, {secondary}); display: flex; align-items: center; justify-content: center; color: white; font-weight: bold; font-size: 14pt; }
.path-body { flex: 1; padding: 10pt 14pt; font-size: 9pt; }
.advice { display: flex; align-items: flex-start; gap: 10pt; margin-bottom: 10pt; }
.advice:last-child { margin-bottom: 0; }
.category-block { margin-bottom: 16pt; }
.category-title { background: {accent}; padding: 6pt 10pt; border-radius: 4pt; margin-bottom: 10pt; }
.project-detail { font-size: 9pt; }
.resource-block { background: {light_bg}; border-radius: 6pt; padding: 14pt; border: 1pt solid {accent}; }
.resource-block h3 { color: {primary}; margin-bottom: 10pt; padding-bottom: 6pt; border-bottom: 2pt solid {primary}; }
.resource { background: white; padding: 8pt; border-radius: 5pt; margin-bottom: 6pt; }
.resource-name { font-weight: bold; color: {secondary}; font-size: 9pt; margin-bottom: 3pt; }
.resource-desc { font-size: 8pt; color: #666; margin-bottom: 3pt; }
.resource-adv { font-size: 8pt; color: {primary}; font-weight: bold; }
.action { padding: 10pt 14pt; background: white; border-radius: 5pt; margin-bottom: 8pt; box-shadow: 0 2pt 6pt rgba(0,0,0,0.06); }
.commitment { padding: 8pt 14pt; background: {accent}; color: {primary}; border-radius: 16pt; font-size: 9pt; font-weight: bold; }
.closing { margin-top: 25pt; padding: 16pt; background: {light_bg}; border-radius: 6pt; text-align: center; }
.closing .greeting { font-size: 12pt; color: {primary}; font-weight: bold; margin-bottom: 6pt; }
.closing .message { color: #666; line-height: 1.8; }
.cover-page { background: linear-gradient(135deg, {primary} 0%, {secondary} 50%, {accent} 100%); display: flex; flex-direction: column; align-items: center; justify-content: center; text-align: center; color: white; }
.cover-page h1 { color: white; font-size: 28pt; margin-bottom: 15pt; text-shadow: 2px 2px 4px rgba(0,0,0,0.2); }
.logo-circle { width: 70pt; height: 70pt; background: white; border-radius: 50%; display: flex; align-items: center; justify-content: center; margin-bottom: 15pt; }
.logo-text { color: {primary}; font-size: 28pt; font-weight: bold; }
.title-box { background: rgba(255,255,255,0.2); padding: 12pt 35pt; border-radius: 25pt; margin-top: 15pt; font-size: 20pt; font-weight: bold; }
.divider-line { width: 50%; height: 1pt; background: linear-gradient(90deg, transparent, white, transparent); margin: 25pt 0; }
.cover-date { position: absolute; bottom: 25mm; font-size: 9pt; opacity: 0.8; }
"#;

// ────────────────────────────────────────────────────────────────────────────
// Page list
// ────────────────────────────────────────────────────────────────────────────

/// One logical A4 page.
struct Page {
    class: &'static str,
    body: String,
}

impl Page {
    fn new(class: &'static str) -> Self {
        Self {
            class,
            body: String::with_capacity(4 * 1024),
        }
    }
}

/// Renders the full report document.
pub fn render_report_html(data: &FullReportData) -> String {
    let pages = [
        cover_page(data),
        institution_page(),
        assessment_page(data),
        career_family_page(data),
        planning_page(data),
        project_table_page(data),
        project_detail_page(data),
        timeline_page(data),
        supply_chain_page(data),
        summary_page(data),
    ];

    let mut out = String::with_capacity(64 * 1024);
    let _ = write!(
        out,
        "<!DOCTYPE html>\n<html lang=\"zh-CN\">\n<head>\n<meta charset=\"UTF-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n\
         <title>{} - 生涯定制报告</title>\n<style>{}</style>\n</head>\n<body>\n",
        esc(&data.input.student_info.name),
        stylesheet()
    );
    for (index, page) in pages.iter().enumerate() {
        let _ = write!(out, "<section class=\"{}\">\n{}", page.class, page.body);
        // The cover carries no number.
        if index > 0 {
            let _ = write!(out, "<div class=\"page-number\">{}</div>\n", index + 1);
        }
        out.push_str("</section>\n");
    }
    out.push_str("</body>\n</html>\n");
    out
}

fn stylesheet() -> String {
    STYLESHEET_TEMPLATE
        .replace("{primary}", COLORS.primary)
        .replace("{secondary}", COLORS.secondary)
        .replace("{accent}", COLORS.accent)
        .replace("{light_bg}", COLORS.light_bg)
        .replace("{text}", COLORS.text)
}

// ────────────────────────────────────────────────────────────────────────────
// Pages
// ────────────────────────────────────────────────────────────────────────────

fn cover_page(data: &FullReportData) -> Page {
    let mut page = Page::new("page cover-page");
    let consultant = &data.input.consultant_info;
    let b = &mut page.body;

    let _ = write!(
        b,
        "<div class=\"logo-circle\"><span class=\"logo-text\">{}</span></div>\
         <p style=\"font-size: 10pt; opacity: 0.9;\">{}</p>\
         <p style=\"font-size: 12pt; font-weight: bold;\">{}</p>\
         <div style=\"margin-top: 40pt;\"><h1>{}</h1><div class=\"title-box\">生涯定制报告</div></div>\
         <div class=\"divider-line\"></div>",
        INSTITUTION.logo,
        INSTITUTION.group,
        INSTITUTION.brand,
        esc(&data.input.student_info.name)
    );

    let _ = write!(
        b,
        "<div style=\"margin-top: 20pt;\">\
         <p style=\"font-size: 10pt; margin-bottom: 6pt;\">专属咨询顾问</p>\
         <p style=\"font-size: 12pt; font-weight: bold; margin-bottom: 6pt;\">{} 老师</p>\
         <p style=\"font-size: 9pt; opacity: 0.9;\">电话/微信：{}",
        esc(&consultant.name),
        esc(&consultant.phone)
    );
    if !consultant.wechat.is_empty() && consultant.wechat != consultant.phone {
        let _ = write!(b, " / {}", esc(&consultant.wechat));
    }
    b.push_str("</p></div>");

    let _ = write!(
        b,
        "<p class=\"cover-date\">报告生成日期：{}</p>\n",
        report_local_time(&data.generated_at).format("%Y年%m月%d日")
    );
    page
}

fn institution_page() -> Page {
    let mut page = Page::new("page page-tinted");
    let b = &mut page.body;

    let _ = write!(
        b,
        "<h1>机构介绍</h1>\
         <div class=\"section\"><h2>机构简介</h2>\
         <p style=\"text-align: justify; line-height: 1.8;\">{}</p>\
         <div class=\"info-box\" style=\"margin-top: 12pt;\">\
         <p><strong>地址：</strong>{}</p>\
         <p><strong>电话：</strong>{}</p>\
         <p><strong>传真：</strong>{}</p>\
         <p><strong>邮箱：</strong>{}</p>\
         </div></div>",
        INSTITUTION.introduction,
        INSTITUTION.address,
        INSTITUTION.phone,
        INSTITUTION.fax,
        INSTITUTION.email
    );

    b.push_str("<div class=\"section\"><h2>核心服务</h2><div class=\"grid-3\">");
    for (index, service) in INSTITUTION.services.iter().enumerate() {
        let _ = write!(
            b,
            "<div class=\"service\"><div class=\"badge\">{}</div><p>{}</p></div>",
            index + 1,
            service
        );
    }
    b.push_str("</div></div>");

    b.push_str(
        "<div class=\"section\"><h2>专家团队</h2>\
         <p style=\"color: #666; margin-bottom: 10pt;\">我们汇聚了来自各领域的顶尖专家，为学生提供全方位的专业指导：</p>\
         <div class=\"flex-grid\">",
    );
    for (index, expert) in INSTITUTION.expert_team.iter().enumerate() {
        let class = if index % 2 == 0 { "tag" } else { "tag tag-outline" };
        let _ = write!(b, "<span class=\"{class}\">{expert}</span>");
    }
    b.push_str("</div></div>\n");
    page
}

fn assessment_page(data: &FullReportData) -> Page {
    let mut page = Page::new("page");
    let analysis = &data.generated.personality_analysis;
    let b = &mut page.body;

    let _ = write!(
        b,
        "<h1>测评结果及家庭分析</h1>\
         <div class=\"section\"><h2>性格测评结论</h2>\
         <div class=\"highlight-box\" style=\"margin-bottom: 14pt;\">\
         <p style=\"font-size: 8pt; margin-bottom: 4pt; opacity: 0.9;\">人格核心类型</p>\
         <p style=\"font-size: 16pt; font-weight: bold;\">{}</p></div>",
        esc(&analysis.core_type)
    );

    b.push_str("<h3>性格优势</h3><div class=\"grid-2\" style=\"margin-bottom: 14pt;\">");
    for strength in &analysis.strengths {
        let _ = write!(b, "<div class=\"strength-item\">✓ {}</div>", esc(strength));
    }
    b.push_str("</div><h3>性格缺点</h3><div class=\"grid-2\" style=\"margin-bottom: 14pt;\">");
    for weakness in &analysis.weaknesses {
        let _ = write!(b, "<div class=\"weakness-item\">△ {}</div>", esc(weakness));
    }
    b.push_str("</div><h3>核心特质总结</h3>");
    for line in &analysis.summary {
        let _ = write!(b, "<p class=\"bullet-item\">{}</p>", esc(line));
    }
    b.push_str("</div>\n");
    page
}

fn career_family_page(data: &FullReportData) -> Page {
    let mut page = Page::new("page");
    let family = &data.input.family_info;
    let b = &mut page.body;

    b.push_str(
        "<div class=\"section\"><h2>职业适配分析</h2>\
         <p class=\"lead\">基于人格特质与兴趣倾向，为您推荐以下职业方向：</p>",
    );
    for (index, career) in data.generated.career_matches.iter().enumerate() {
        let _ = write!(
            b,
            "<div class=\"card career\"><div class=\"card-head\"><span class=\"badge\">{}</span>\
             <div><h3 style=\"margin: 0; color: {};\">{}</h3><p class=\"reason\">{}</p></div></div>\
             <div class=\"flex-grid\">",
            index + 1,
            COLORS.primary,
            esc(&career.direction),
            esc(&career.match_reason)
        );
        for position in &career.positions {
            let _ = write!(b, "<span class=\"chip\">{}</span>", esc(position));
        }
        b.push_str("</div></div>");
    }
    b.push_str("</div>");

    let _ = write!(
        b,
        "<div class=\"section\"><h2>家庭情况分析</h2><div class=\"tinted-box\"><div class=\"grid-2\"><div>\
         <p class=\"bullet-item\"><strong>家庭结构：</strong>{}</p>\
         <p class=\"bullet-item\"><strong>家庭产业/父母职业：</strong>{}</p>\
         <p class=\"bullet-item\"><strong>经济预算：</strong>{}</p>\
         </div><div><p class=\"bullet-item\"><strong>家庭资源：</strong></p>\
         <div style=\"padding-left: 16pt; margin-top: 5pt;\">",
        esc(&family.structure),
        esc(&family.parent_occupation),
        esc(&family.budget)
    );
    for resource in &family.resources {
        let _ = write!(b, "<span class=\"tag\">{}</span>", esc(resource));
    }
    let _ = write!(
        b,
        "</div></div></div>\
         <div style=\"margin-top: 14pt; padding-top: 14pt; border-top: 1pt dashed {};\">\
         <h3>家庭诉求</h3>\
         <p class=\"bullet-item\"><strong>升学目标：</strong>{}</p>\
         <p class=\"bullet-item\"><strong>就业期望：</strong>{}</p>\
         <p class=\"bullet-item\"><strong>地域偏好：</strong>{}</p>\
         </div></div></div>\n",
        COLORS.accent,
        esc(&family.demands.education_goal),
        esc(&family.demands.career_expectation),
        esc(&family.demands.location_preference)
    );
    page
}

fn planning_page(data: &FullReportData) -> Page {
    let mut page = Page::new("page");
    let generated = &data.generated;
    let b = &mut page.body;

    b.push_str("<h1>咨询规划建议</h1><div class=\"section\"><h2>核心发展路径</h2>");
    for (index, path) in generated.development_paths.iter().enumerate() {
        let _ = write!(
            b,
            "<div class=\"path\"><div class=\"path-index\">{}</div><div class=\"path-body grid-3\">\
             <div><p class=\"label\">升学方向</p><p style=\"font-weight: bold; color: {};\">{}</p></div>\
             <div><p class=\"label\">职业目标</p><p class=\"emphasis\">{}</p></div>\
             <div><p class=\"label\">资源适配</p><p style=\"font-weight: bold;\">{}</p></div>\
             </div></div>",
            index + 1,
            COLORS.primary,
            esc(&path.education_direction),
            esc(&path.career_goal),
            esc(&path.resource_match)
        );
    }
    b.push_str(
        "</div><div class=\"section\"><h2>职业规划建议</h2><table><thead><tr>\
         <th style=\"width: 22%;\">就业领域</th>\
         <th style=\"width: 39%;\">短期发展路径</th>\
         <th style=\"width: 39%;\">长期发展路径</th>\
         </tr></thead><tbody>",
    );
    for advice in &generated.career_advice {
        let _ = write!(
            b,
            "<tr><td class=\"key\">{}</td><td>{}</td><td>{}</td></tr>",
            esc(&advice.field),
            esc(&advice.short_term_path),
            esc(&advice.long_term_path)
        );
    }
    b.push_str("</tbody></table></div><div class=\"section\"><h2>家庭配合建议</h2><div class=\"tinted-box\">");
    for (index, advice) in generated.family_cooperation_advice.iter().enumerate() {
        let _ = write!(
            b,
            "<div class=\"advice\"><span class=\"badge badge-soft\">{}</span><p style=\"line-height: 1.6;\">{}</p></div>",
            index + 1,
            esc(advice)
        );
    }
    b.push_str("</div></div>\n");
    page
}

fn project_table_page(data: &FullReportData) -> Page {
    let mut page = Page::new("page");
    let b = &mut page.body;

    b.push_str(
        "<h1>升学项目建议</h1><div class=\"section\"><h2>项目推荐列表</h2>\
         <table class=\"compact\"><thead><tr>\
         <th style=\"width: 16%;\">项目名称</th>\
         <th style=\"width: 12%;\">学费范围</th>\
         <th style=\"width: 22%;\">优势</th>\
         <th style=\"width: 22%;\">劣势</th>\
         <th style=\"width: 12%;\">推荐指数</th>\
         <th style=\"width: 16%;\">咨询费</th>\
         </tr></thead><tbody>",
    );
    for project in &data.generated.education_projects {
        let _ = write!(
            b,
            "<tr><td style=\"font-weight: bold;\">{}</td><td>{}</td><td>",
            esc(&project.name),
            esc(&project.tuition_range)
        );
        for advantage in &project.advantages {
            let _ = write!(b, "<span style=\"display: block;\">• {}</span>", esc(advantage));
        }
        b.push_str("</td><td>");
        for disadvantage in &project.disadvantages {
            let _ = write!(b, "<span style=\"display: block;\">• {}</span>", esc(disadvantage));
        }
        let _ = write!(
            b,
            "</td><td class=\"stars\">{}</td><td>{}</td></tr>",
            star_rating(project.recommend_index),
            esc(&project.consulting_fee_range)
        );
    }
    b.push_str("</tbody></table></div>\n");
    page
}

fn project_detail_page(data: &FullReportData) -> Page {
    let mut page = Page::new("page");
    let b = &mut page.body;

    b.push_str("<h2>项目详解</h2>");
    for (category, projects) in group_education_projects(&data.generated.education_projects) {
        let _ = write!(
            b,
            "<div class=\"category-block\"><h3 class=\"category-title\">{}</h3>",
            category.label()
        );
        for project in projects {
            let _ = write!(
                b,
                "<div class=\"card project-detail\"><h4>{}</h4><div class=\"grid-2\">",
                esc(&project.name)
            );
            detail_cell(b, "项目原理", project.principle.as_deref(), false);
            detail_cell(b, "录取要求", project.requirements.as_deref(), true);
            detail_cell(b, "时间节点", project.timeline.as_deref(), true);
            detail_cell(b, "申请流程", project.process.as_deref(), false);
            b.push_str("</div></div>");
        }
        b.push_str("</div>");
    }
    b.push('\n');
    page
}

/// Absent or empty optional fields render as nothing.
fn detail_cell(b: &mut String, label: &str, value: Option<&str>, emphasis: bool) {
    let Some(value) = value.filter(|v| !v.is_empty()) else {
        return;
    };
    let class = if emphasis { " class=\"emphasis\"" } else { "" };
    let _ = write!(
        b,
        "<div><p class=\"label\">{label}</p><p{class}>{}</p></div>",
        esc(value)
    );
}

fn timeline_page(data: &FullReportData) -> Page {
    let mut page = Page::new("page");
    let b = &mut page.body;

    let _ = write!(
        b,
        "<h1>申请时间表</h1><table class=\"compact\"><thead><tr style=\"background: {};\">\
         <th style=\"width: 14%;\">阶段</th>\
         <th style=\"width: 14%;\">时间</th>\
         <th style=\"width: 46%;\">核心任务</th>\
         <th style=\"width: 26%;\">注意事项</th>\
         </tr></thead><tbody>",
        COLORS.secondary
    );
    for item in &data.generated.timeline {
        let _ = write!(
            b,
            "<tr class=\"stage\"><td class=\"key\">{}</td><td>{}</td><td>",
            esc(&item.stage),
            esc(&item.time)
        );
        for (index, task) in item.tasks.iter().enumerate() {
            let class = if index % 2 == 0 { "task task-alt" } else { "task" };
            let _ = write!(b, "<span class=\"{class}\">{}</span>", esc(task));
        }
        let _ = write!(b, "</td><td class=\"muted\">{}</td></tr>", esc(&item.notes));
    }
    b.push_str("</tbody></table>\n");
    page
}

fn supply_chain_page(data: &FullReportData) -> Page {
    let mut page = Page::new("page");
    let b = &mut page.body;

    b.push_str("<h1>供应链项目推荐</h1><div class=\"grid-2\" style=\"gap: 14pt;\">");
    for (category, projects) in group_supply_chain_projects(&data.generated.supply_chain_projects)
    {
        let _ = write!(
            b,
            "<div class=\"resource-block\"><h3>{}</h3>",
            category.label()
        );
        for project in projects {
            let _ = write!(
                b,
                "<div class=\"resource\"><p class=\"resource-name\">{}</p>\
                 <p class=\"resource-desc\">{}</p><p class=\"resource-adv\">✓ {}</p></div>",
                esc(&project.name),
                esc(&project.description),
                esc(&project.advantage)
            );
        }
        b.push_str("</div>");
    }
    b.push_str("</div>\n");
    page
}

fn summary_page(data: &FullReportData) -> Page {
    let mut page = Page::new("page");
    let summary = &data.generated.summary;
    let b = &mut page.body;

    let _ = write!(
        b,
        "<h1>规划总结与行动建议</h1>\
         <div class=\"section\"><h2>整体规划逻辑</h2><div class=\"info-box\"><p style=\"line-height: 1.8;\">{}</p></div></div>\
         <div class=\"section\"><h2>学生核心竞争力</h2><div class=\"highlight-box\"><p style=\"font-size: 10pt; line-height: 1.8;\">{}</p></div></div>\
         <div class=\"section\"><h2>后续行动建议</h2>",
        esc(&summary.planning_logic),
        esc(&summary.core_competence)
    );
    for (index, suggestion) in summary.action_suggestions.iter().enumerate() {
        let _ = write!(
            b,
            "<div class=\"action row\"><span class=\"badge badge-soft\">{}</span><p>{}</p></div>",
            index + 1,
            esc(suggestion)
        );
    }
    b.push_str("</div><div class=\"section\"><h2>机构服务承诺</h2><div class=\"flex-grid\">");
    for commitment in &summary.service_commitment {
        let _ = write!(b, "<div class=\"commitment\">✓ {}</div>", esc(commitment));
    }
    let _ = write!(
        b,
        "</div></div>\
         <div class=\"closing\"><p class=\"greeting\">亲爱的{}同学</p>\
         <p class=\"message\">每一个梦想都值得被认真对待，每一份努力都将开花结果。<br />\
         {}将陪伴你的每一步成长，助你成就精彩人生！</p></div>\n",
        esc(&data.input.student_info.name),
        INSTITUTION.brand
    );
    page
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

/// `k` filled stars then `5 - k` empty ones, with `k` clamped to 0..=5.
pub fn star_rating(recommend_index: i32) -> String {
    let filled = recommend_index.clamp(0, MAX_STARS) as usize;
    let mut stars = String::with_capacity(MAX_STARS as usize * FILLED_STAR.len_utf8());
    stars.extend(std::iter::repeat(FILLED_STAR).take(filled));
    stars.extend(std::iter::repeat(EMPTY_STAR).take(MAX_STARS as usize - filled));
    stars
}

/// Buckets projects into the fixed category order, keeping array order inside
/// each bucket. Empty buckets are omitted; unknown categories are dropped.
pub fn group_education_projects(
    projects: &[EducationProject],
) -> Vec<(EducationCategory, Vec<&EducationProject>)> {
    EducationCategory::ALL
        .into_iter()
        .map(|category| {
            let members = projects
                .iter()
                .filter(|p| p.category == category.label())
                .collect::<Vec<_>>();
            (category, members)
        })
        .filter(|(_, members)| !members.is_empty())
        .collect()
}

/// Same bucketing rules as [`group_education_projects`].
pub fn group_supply_chain_projects(
    projects: &[SupplyChainProject],
) -> Vec<(SupplyChainCategory, Vec<&SupplyChainProject>)> {
    SupplyChainCategory::ALL
        .into_iter()
        .map(|category| {
            let members = projects
                .iter()
                .filter(|p| p.category == category.label())
                .collect::<Vec<_>>();
            (category, members)
        })
        .filter(|(_, members)| !members.is_empty())
        .collect()
}

/// Escape text for HTML.
fn esc(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
    }
    out
}
