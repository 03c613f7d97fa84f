use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建教学班表（排课子系统所有，此处建表供本地部署）
        manager
            .create_table(
                Table::create()
                    .table(ClassOfferings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ClassOfferings::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ClassOfferings::Name).string().not_null())
                    .col(
                        ColumnDef::new(ClassOfferings::AcademicPeriod)
                            .string()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建教学班成员表（选课子系统所有）
        manager
            .create_table(
                Table::create()
                    .table(OfferingMembers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OfferingMembers::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(OfferingMembers::ClassOfferingId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(OfferingMembers::UserId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(OfferingMembers::Role).string().not_null())
                    .col(
                        ColumnDef::new(OfferingMembers::Position)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_offering_members_offering")
                    .table(OfferingMembers::Table)
                    .col(OfferingMembers::ClassOfferingId)
                    .col(OfferingMembers::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 创建计分成分表
        manager
            .create_table(
                Table::create()
                    .table(GradingComponents::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GradingComponents::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(GradingComponents::ClassOfferingId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(GradingComponents::Name).string().not_null())
                    .col(ColumnDef::new(GradingComponents::Weight).double().not_null())
                    .col(
                        ColumnDef::new(GradingComponents::MaxScore)
                            .double()
                            .not_null(),
                    )
                    .col(ColumnDef::new(GradingComponents::Scheme).string().not_null())
                    .col(
                        ColumnDef::new(GradingComponents::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(GradingComponents::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GradingComponents::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_grading_components_offering")
                    .table(GradingComponents::Table)
                    .col(GradingComponents::ClassOfferingId)
                    .to_owned(),
            )
            .await?;

        // 创建原始测评分数表（测评子系统所有）
        manager
            .create_table(
                Table::create()
                    .table(AssessmentGrades::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AssessmentGrades::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AssessmentGrades::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AssessmentGrades::ComponentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(AssessmentGrades::Score).double().not_null())
                    .col(
                        ColumnDef::new(AssessmentGrades::GradedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(AssessmentGrades::Table, AssessmentGrades::ComponentId)
                            .to(GradingComponents::Table, GradingComponents::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_assessment_grades_student_component")
                    .table(AssessmentGrades::Table)
                    .col(AssessmentGrades::StudentId)
                    .col(AssessmentGrades::ComponentId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 创建计分公式表
        manager
            .create_table(
                Table::create()
                    .table(GradingFormulas::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GradingFormulas::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(GradingFormulas::ClassOfferingId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(GradingFormulas::Expression).text().not_null())
                    .col(
                        ColumnDef::new(GradingFormulas::OutputScale)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GradingFormulas::GradeBoundaries)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GradingFormulas::IsActive)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(GradingFormulas::CreatedBy)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GradingFormulas::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_grading_formulas_offering_active")
                    .table(GradingFormulas::Table)
                    .col(GradingFormulas::ClassOfferingId)
                    .col(GradingFormulas::IsActive)
                    .to_owned(),
            )
            .await?;

        // 创建成绩计算批次表
        manager
            .create_table(
                Table::create()
                    .table(GradeComputations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GradeComputations::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(GradeComputations::ClassOfferingId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GradeComputations::FormulaId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GradeComputations::TriggeredBy)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(GradeComputations::Status).string().not_null())
                    .col(
                        ColumnDef::new(GradeComputations::StudentCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(GradeComputations::SucceededCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(GradeComputations::FailedCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(GradeComputations::StartedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GradeComputations::FinishedAt)
                            .big_integer()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(GradeComputations::Table, GradeComputations::FormulaId)
                            .to(GradingFormulas::Table, GradingFormulas::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_grade_computations_offering_status")
                    .table(GradeComputations::Table)
                    .col(GradeComputations::ClassOfferingId)
                    .col(GradeComputations::Status)
                    .to_owned(),
            )
            .await?;

        // 创建最终成绩表
        manager
            .create_table(
                Table::create()
                    .table(FinalGrades::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FinalGrades::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(FinalGrades::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FinalGrades::ClassOfferingId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FinalGrades::ComputationId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(FinalGrades::RawScore).double().not_null())
                    .col(ColumnDef::new(FinalGrades::Letter).string().not_null())
                    .col(ColumnDef::new(FinalGrades::Status).string().not_null())
                    .col(ColumnDef::new(FinalGrades::OverrideScore).double().null())
                    .col(ColumnDef::new(FinalGrades::OverrideLetter).string().null())
                    .col(ColumnDef::new(FinalGrades::OverrideReason).text().null())
                    .col(ColumnDef::new(FinalGrades::OverrideBy).big_integer().null())
                    .col(ColumnDef::new(FinalGrades::OverrideAt).big_integer().null())
                    .col(ColumnDef::new(FinalGrades::PublishedAt).big_integer().null())
                    .col(ColumnDef::new(FinalGrades::LockedAt).big_integer().null())
                    .col(
                        ColumnDef::new(FinalGrades::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(FinalGrades::Table, FinalGrades::ComputationId)
                            .to(GradeComputations::Table, GradeComputations::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_final_grades_student_offering")
                    .table(FinalGrades::Table)
                    .col(FinalGrades::StudentId)
                    .col(FinalGrades::ClassOfferingId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FinalGrades::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(GradeComputations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(GradingFormulas::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AssessmentGrades::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(GradingComponents::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(OfferingMembers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ClassOfferings::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum ClassOfferings {
    Table,
    Id,
    Name,
    AcademicPeriod,
}

#[derive(DeriveIden)]
enum OfferingMembers {
    Table,
    Id,
    ClassOfferingId,
    UserId,
    Role,
    Position,
}

#[derive(DeriveIden)]
enum GradingComponents {
    Table,
    Id,
    ClassOfferingId,
    Name,
    Weight,
    MaxScore,
    Scheme,
    Active,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum AssessmentGrades {
    Table,
    Id,
    StudentId,
    ComponentId,
    Score,
    GradedAt,
}

#[derive(DeriveIden)]
enum GradingFormulas {
    Table,
    Id,
    ClassOfferingId,
    Expression,
    OutputScale,
    GradeBoundaries,
    IsActive,
    CreatedBy,
    CreatedAt,
}

#[derive(DeriveIden)]
enum GradeComputations {
    Table,
    Id,
    ClassOfferingId,
    FormulaId,
    TriggeredBy,
    Status,
    StudentCount,
    SucceededCount,
    FailedCount,
    StartedAt,
    FinishedAt,
}

#[derive(DeriveIden)]
enum FinalGrades {
    Table,
    Id,
    StudentId,
    ClassOfferingId,
    ComputationId,
    RawScore,
    Letter,
    Status,
    OverrideScore,
    OverrideLetter,
    OverrideReason,
    OverrideBy,
    OverrideAt,
    PublishedAt,
    LockedAt,
    UpdatedAt,
}
