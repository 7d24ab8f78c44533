//! Compiled-in branding: colour palette and institution details.

pub struct Palette {
    pub primary: &'static str,
    pub secondary: &'static str,
    pub accent: &'static str,
    pub light_bg: &'static str,
    pub text: &'static str,
}

pub const COLORS: Palette = Palette {
    primary: "#B04047",
    secondary: "#CC6471",
    accent: "#D3A5A9",
    light_bg: "#FDF5F5",
    text: "#333333",
};

pub struct Institution {
    pub group: &'static str,
    pub brand: &'static str,
    /// Single glyph shown in the cover logo.
    pub logo: &'static str,
    pub address: &'static str,
    pub phone: &'static str,
    pub fax: &'static str,
    pub email: &'static str,
    pub introduction: &'static str,
    pub services: [&'static str; 6],
    pub expert_team: [&'static str; 5],
}

pub const INSTITUTION: Institution = Institution {
    group: "中海皓联教育科技集团",
    brand: "华芯百科",
    logo: "华",
    address: "上海市静安区万荣路700号A2栋",
    phone: "021-52729115",
    fax: "021-66392688",
    email: "contact@huaxinbaike.com",
    introduction: "中海皓联教育科技集团旗下华芯百科，是一家专注于AI智能教育规划的领先机构。\
        我们致力于为初中至本科阶段的学生提供专业、个性化的生涯规划服务，\
        帮助每一位学生找到最适合自己的发展道路，实现升学与职业目标的完美匹配。",
    services: [
        "AI智能规划",
        "升学辅导",
        "职业规划",
        "资源对接",
        "背景提升",
        "留学申请",
    ],
    expert_team: [
        "顶尖大学教授团队",
        "世界500强企业高管",
        "资深HR面试官",
        "海外教育专家",
        "行业领军人物",
    ],
};
