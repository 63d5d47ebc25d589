//! Chapter curriculum: ordering, titles and review chapters per HSK level.
//!
//! Every level ends with a review chapter. Review chapters hold no words of
//! their own and are never selectable for chapter practice.

use crate::types::{ChapterId, HskLevel};
use serde::Serialize;

/// Static description of one chapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChapterInfo {
    pub id: ChapterId,
    pub title: String,
    pub description: String,
    pub is_review: bool,
}

impl ChapterInfo {
    pub fn display_title(&self) -> String {
        format!("Chapter {}: {}", self.id.number, self.title)
    }
}

/// Ordered chapter table.
#[derive(Debug, Clone, Default)]
pub struct Curriculum {
    chapters: Vec<ChapterInfo>,
}

const HSK1: &[(&str, &str)] = &[
    ("你好 (Hello)", "Basic greetings, personal pronouns, introductions, numbers 0-10"),
    ("姓名 (Names and Introductions)", "What's your name, surnames and given names"),
    ("国家 (Countries and Nationalities)", "Where are you from, countries, languages"),
    ("家庭 (Family)", "Family members, age, possessive particle 的"),
    ("时间 (Time)", "What time, hours, days of the week, today/yesterday/tomorrow"),
    ("日期 (Dates)", "Months, dates, years"),
    ("天气 (Weather)", "Weather conditions, hot/cold, rain/sunny"),
    ("购物 (Shopping)", "How much, money, buy/sell, this/that"),
    ("食物 (Food)", "Eating and drinking, basic foods, hungry/thirsty"),
    ("交通 (Transportation)", "Vehicles, go/come, where, home/school"),
    ("学习 (Study)", "Study Chinese, teacher/student, books, can/will"),
    ("工作 (Work)", "What do you do, professions, busy"),
    ("爱好 (Hobbies)", "What do you like, activities, movies/books"),
    ("位置 (Locations)", "Where is, directions, inside/outside, here/there"),
    ("复习 (Review)", "Comprehensive review of all HSK 1 vocabulary"),
];

const HSK2: &[(&str, &str)] = &[
    ("衣服 (Clothing)", "Clothing items, colors, wear, beautiful/ugly"),
    ("身体 (Body and Health)", "Body parts, illness, pain, hospital/medicine"),
    ("运动 (Sports and Exercise)", "Sports, play, exercise, tired/rest"),
    ("旅行 (Travel)", "Travel, transportation, tickets, hotel"),
    ("节日 (Festivals and Celebrations)", "Festivals, celebrate, gifts, happy"),
    ("学校生活 (School Life)", "School facilities, subjects, homework, exams"),
    ("比较 (Comparisons)", "Comparative sentences, more/less, same/different"),
    ("动作 (Actions and Activities)", "Daily actions, walking, opening/closing, begin/finish"),
    ("情感 (Emotions)", "Happy/sad, angry, worried, love"),
    ("方向 (Directions)", "Asking for directions, turn left/right, far/near"),
    ("助动词 (Modal Verbs)", "Can/able to, should, want to, have to"),
    ("完成时态 (Completed Actions)", "Aspect particles 了/过, currently happening, about to"),
    ("复习与测试 (Review and Testing)", "HSK 2 comprehensive review"),
];

const HSK3: &[(&str, &str)] = &[
    ("描述人物 (Describing People)", "Physical appearance, personality, character traits"),
    ("饮食文化 (Food Culture)", "Chinese cuisine, cooking methods, taste, dining"),
    ("住房 (Housing)", "Types of housing, rooms, rent, furniture"),
    ("购物消费 (Shopping and Consumption)", "Shopping locations, bargaining, payment, quality"),
    ("通讯 (Communication)", "Phone, internet, contact, messages"),
    ("工作职业 (Career and Professions)", "Job interview, company, boss/colleague, salary"),
    ("教育 (Education)", "University, major, graduate, degree"),
    ("环境 (Environment)", "Nature, environmental issues, clean/dirty, protect"),
    ("科技 (Technology)", "Computer, internet, technology, modern"),
    ("文化艺术 (Culture and Arts)", "Art, music, literature, traditional"),
    ("社会关系 (Social Relationships)", "Friends, relationships, society, help each other"),
    ("表达观点 (Expressing Opinions)", "I think, opinion, agree/disagree, reason"),
    ("时间表达 (Time Expressions)", "Time periods, duration, frequency, recently"),
    ("复习与应用 (Review and Application)", "HSK 3 comprehensive review"),
];

const HSK4: &[(&str, &str)] = &[
    ("社会现象 (Social Phenomena)", "Social issues, development, change, influence"),
    ("经济生活 (Economic Life)", "Economy, business, investment, market"),
    ("健康保健 (Health and Healthcare)", "Health, medical treatment, prevention, nutrition"),
    ("人际交往 (Interpersonal Relations)", "Communication, cooperation, trust, respect"),
    ("学习方法 (Study Methods)", "Learning methods, improve, practice, memory"),
    ("文化差异 (Cultural Differences)", "Culture, customs, difference, understanding"),
    ("新闻媒体 (News and Media)", "News, media, information, report"),
    ("法律道德 (Law and Ethics)", "Law, rules, ethics, justice"),
    ("科学技术 (Science and Technology)", "Science, research, innovation, progress"),
    ("历史地理 (History and Geography)", "History, ancient, geography, location"),
    ("文学艺术 (Literature and Arts)", "Literature, poetry, novel, artistic"),
    ("体育竞技 (Sports and Competition)", "Competition, team, victory, championship"),
    ("环境保护 (Environmental Protection)", "Environment, protect, pollution, resource"),
    ("复习强化 (Review and Reinforcement)", "HSK 4 comprehensive review"),
];

const HSK5: &[(&str, &str)] = &[
    ("政治制度 (Political Systems)", "Politics, government, democracy, policy"),
    ("哲学思想 (Philosophy and Thought)", "Philosophy, thinking, logic, wisdom"),
    ("心理学 (Psychology)", "Psychology, emotion, behavior, personality"),
    ("社会学 (Sociology)", "Society, social class, community, population"),
    ("国际关系 (International Relations)", "International, diplomacy, cooperation, conflict"),
    ("宗教信仰 (Religion and Beliefs)", "Religion, belief, faith, spirit"),
    ("科学研究 (Scientific Research)", "Research, experiment, theory, discovery"),
    ("医学健康 (Medicine and Health)", "Medicine, treatment, disease, surgery"),
    ("教育制度 (Education System)", "Education system, curriculum, teaching method, academic"),
    ("文化传承 (Cultural Heritage)", "Heritage, tradition, inherit, preserve"),
    ("经济发展 (Economic Development)", "Development, growth, industry, agriculture"),
    ("复习综合 (Comprehensive Review)", "HSK 5 comprehensive review"),
];

const HSK6: &[(&str, &str)] = &[
    ("学术研究 (Academic Research)", "Academic, research methodology, thesis, analysis"),
    ("商业管理 (Business Management)", "Management, strategy, leadership, organization"),
    ("法律制度 (Legal System)", "Legal system, court, judge, evidence"),
    ("文学创作 (Literary Creation)", "Literature, creation, style, criticism"),
    ("艺术评论 (Art Criticism)", "Art criticism, aesthetic, interpretation, masterpiece"),
    (
        "科技创新 (Technological Innovation)",
        "Innovation, technology transfer, patent, breakthrough",
    ),
    (
        "环境科学 (Environmental Science)",
        "Environmental science, ecosystem, sustainability, conservation",
    ),
    ("心理咨询 (Psychological Counseling)", "Counseling, therapy, mental health, rehabilitation"),
    ("社会政策 (Social Policy)", "Social policy, welfare, reform, implementation"),
    ("国际贸易 (International Trade)", "International trade, export, import, globalization"),
    ("文化交流 (Cultural Exchange)", "Cultural exchange, cross-cultural, integration, diversity"),
    ("综合应用 (Comprehensive Application)", "HSK 6 final review, professional communication"),
];

impl Curriculum {
    /// The bundled HSK 1-6 curriculum (80 chapters).
    pub fn hsk() -> Self {
        let tables = [HSK1, HSK2, HSK3, HSK4, HSK5, HSK6];
        let chapters = HskLevel::ALL
            .iter()
            .zip(tables)
            .flat_map(|(level, table)| {
                let last = table.len();
                table.iter().enumerate().map(move |(idx, (title, description))| ChapterInfo {
                    id: ChapterId::new(*level, (idx + 1) as u8),
                    title: title.to_string(),
                    description: description.to_string(),
                    is_review: idx + 1 == last,
                })
            })
            .collect();
        Self { chapters }
    }

    /// Build from an explicit table. Chapters keep the given order.
    pub fn from_chapters(chapters: Vec<ChapterInfo>) -> Self {
        Self { chapters }
    }

    pub fn chapters(&self) -> &[ChapterInfo] {
        &self.chapters
    }

    pub fn chapter(&self, id: ChapterId) -> Option<&ChapterInfo> {
        self.chapters.iter().find(|c| c.id == id)
    }

    pub fn contains(&self, id: ChapterId) -> bool {
        self.chapter(id).is_some()
    }

    pub fn is_review(&self, id: ChapterId) -> bool {
        self.chapter(id).is_some_and(|c| c.is_review)
    }

    pub fn chapters_for_level(&self, level: HskLevel) -> impl Iterator<Item = &ChapterInfo> {
        self.chapters.iter().filter(move |c| c.id.level == level)
    }

    /// Non-review chapters of a level, in order.
    pub fn learning_chapters(&self, level: HskLevel) -> Vec<ChapterId> {
        self.chapters_for_level(level)
            .filter(|c| !c.is_review)
            .map(|c| c.id)
            .collect()
    }

    pub fn first_of_level(&self, level: HskLevel) -> Option<ChapterId> {
        self.chapters_for_level(level).next().map(|c| c.id)
    }

    /// Nearest earlier chapter of the same level that is not a review chapter.
    pub fn preceding_non_review(&self, id: ChapterId) -> Option<ChapterId> {
        let position = self.chapters.iter().position(|c| c.id == id)?;
        self.chapters[..position]
            .iter()
            .rev()
            .take_while(|c| c.id.level == id.level)
            .find(|c| !c.is_review)
            .map(|c| c.id)
    }

    /// Position in curriculum order.
    pub fn position(&self, id: ChapterId) -> Option<usize> {
        self.chapters.iter().position(|c| c.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_bundled_curriculum_shape() {
        let curriculum = Curriculum::hsk();
        assert_eq!(curriculum.chapters().len(), 80);

        let counts: Vec<usize> = HskLevel::ALL
            .iter()
            .map(|l| curriculum.chapters_for_level(*l).count())
            .collect();
        assert_eq!(counts, vec![15, 13, 14, 14, 12, 12]);

        for level in HskLevel::ALL {
            let reviews: Vec<_> = curriculum
                .chapters_for_level(level)
                .filter(|c| c.is_review)
                .collect();
            assert_eq!(reviews.len(), 1);
            assert_eq!(
                Some(reviews[0].id),
                curriculum.chapters_for_level(level).last().map(|c| c.id)
            );
        }
    }

    #[test]
    fn test_first_and_preceding() {
        let curriculum = Curriculum::hsk();
        let first = ChapterId::new(HskLevel::Hsk2, 1);
        assert_eq!(curriculum.first_of_level(HskLevel::Hsk2), Some(first));
        assert_eq!(curriculum.preceding_non_review(first), None);
        assert_eq!(
            curriculum.preceding_non_review(ChapterId::new(HskLevel::Hsk2, 4)),
            Some(ChapterId::new(HskLevel::Hsk2, 3))
        );
        assert_eq!(curriculum.learning_chapters(HskLevel::Hsk1).len(), 14);
    }

    #[test]
    fn test_preceding_skips_review_chapters() {
        let chapter = |number, is_review| ChapterInfo {
            id: ChapterId::new(HskLevel::Hsk1, number),
            title: format!("c{number}"),
            description: String::new(),
            is_review,
        };
        let curriculum =
            Curriculum::from_chapters(vec![chapter(1, false), chapter(2, true), chapter(3, false)]);
        assert_eq!(
            curriculum.preceding_non_review(ChapterId::new(HskLevel::Hsk1, 3)),
            Some(ChapterId::new(HskLevel::Hsk1, 1))
        );
    }

    #[test]
    fn test_display_title() {
        let curriculum = Curriculum::hsk();
        let info = curriculum.chapter(ChapterId::new(HskLevel::Hsk1, 1)).unwrap();
        assert_eq!(info.display_title(), "Chapter 1: 你好 (Hello)");
    }
}
