//! 校区、楼宇类型与楼宇配置。

use std::fmt;

/// 校区。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Campus {
    /// 花园校区
    Huayuan,
    /// 龙子湖校区
    Longzihu,
    /// 江淮校区
    Jianghuai,
}

impl Campus {
    pub fn from_no(campus_no: u8) -> Option<Self> {
        match campus_no {
            1 => Some(Campus::Huayuan),
            2 => Some(Campus::Longzihu),
            3 => Some(Campus::Jianghuai),
            _ => None,
        }
    }

    /// 编码中的校区号。
    pub fn no(self) -> u8 {
        match self {
            Campus::Huayuan => 1,
            Campus::Longzihu => 2,
            Campus::Jianghuai => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Campus::Huayuan => "花园校区",
            Campus::Longzihu => "龙子湖校区",
            Campus::Jianghuai => "江淮校区",
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Campus::Huayuan => "HY",
            Campus::Longzihu => "LZ",
            Campus::Jianghuai => "JH",
        }
    }
}

/// 未知校区的展示名。
pub const UNKNOWN_CAMPUS_NAME: &str = "未知";

/// 按校区号取展示名，未知校区返回 `未知`。
pub fn campus_name(campus_no: u8) -> &'static str {
    Campus::from_no(campus_no)
        .map(Campus::name)
        .unwrap_or(UNKNOWN_CAMPUS_NAME)
}

/// 楼宇类型。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BuildingType {
    Education,
    Experiment,
    Dormitory,
}

impl BuildingType {
    pub fn as_str(self) -> &'static str {
        match self {
            BuildingType::Education => "education",
            BuildingType::Experiment => "experiment",
            BuildingType::Dormitory => "dormitory",
        }
    }

    /// 中文类型名（用于楼宇展示名）。
    pub fn label(self) -> &'static str {
        match self {
            BuildingType::Education => "教学楼",
            BuildingType::Experiment => "实验楼",
            BuildingType::Dormitory => "宿舍楼",
        }
    }
}

impl fmt::Display for BuildingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 服务端下发的楼宇配置。
///
/// 每次加载拓扑时整体获取、整体替换，不做局部修改。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildingConfig {
    pub education_start: u32,
    pub experiment_start: u32,
    pub dormitory_start: u32,
    pub total_buildings: u32,
    pub floors: u32,
    pub rooms: u32,
}

impl BuildingConfig {
    /// 配置源不可用时使用的默认配置 `{1,3,4,6,6,10}`。
    pub const FALLBACK: BuildingConfig = BuildingConfig {
        education_start: 1,
        experiment_start: 3,
        dormitory_start: 4,
        total_buildings: 6,
        floors: 6,
        rooms: 10,
    };

    /// 校验配置是否可用于拓扑与编码。
    ///
    /// 要求全部为正数、`education_start ≤ experiment_start ≤ total_buildings`，
    /// 且楼栋/楼层/单元数量不超出编码范围。
    pub fn validate(&self) -> Result<(), InvalidBuildingConfig> {
        let fields = [
            ("educationStart", self.education_start),
            ("experimentStart", self.experiment_start),
            ("dormitoryStart", self.dormitory_start),
            ("totalBuildings", self.total_buildings),
            ("floors", self.floors),
            ("rooms", self.rooms),
        ];
        if let Some((name, _)) = fields.iter().find(|(_, value)| *value == 0) {
            return Err(InvalidBuildingConfig(format!("{} must be positive", name)));
        }
        if self.education_start > self.experiment_start {
            return Err(InvalidBuildingConfig(
                "educationStart must not exceed experimentStart".to_string(),
            ));
        }
        if self.experiment_start > self.total_buildings {
            return Err(InvalidBuildingConfig(
                "experimentStart must not exceed totalBuildings".to_string(),
            ));
        }
        if self.total_buildings > 99 || self.floors > 99 {
            return Err(InvalidBuildingConfig(
                "totalBuildings and floors must fit in two digits".to_string(),
            ));
        }
        if self.rooms > 999 {
            return Err(InvalidBuildingConfig(
                "rooms must fit in three digits".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for BuildingConfig {
    fn default() -> Self {
        Self::FALLBACK
    }
}

/// 楼宇配置不合法。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid building config: {0}")]
pub struct InvalidBuildingConfig(pub String);

/// 派生的楼宇信息（不持久化，配置或校区变化时整体重建）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildingInfo {
    /// `{type}-{campus}-{building}`
    pub id: String,
    pub building_type: BuildingType,
    pub name: String,
    pub building_no: u32,
}
