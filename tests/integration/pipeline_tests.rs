//! End-to-end analysis tests
//!
//! A small but complete single-module project is classified without touching
//! the disk; the expected removals cover every reference convention.

mod common;

use common::{Project, XML_PROLOG};
use searchdeadres::collect::{Collector, DeclarationCollector};
use searchdeadres::config::Config;
use searchdeadres::prune::{Analysis, KeepReason, ResourceAnalyzer};
use searchdeadres::resource::{Location, ResourceType};
use std::collections::BTreeSet;

const MAIN_ACTIVITY: &str = r#"package com.example.app

import com.example.core.R as CoreR

class MainActivity : AppCompatActivity() {
    private lateinit var binding: ActivityMainBinding

    override fun onCreate(savedInstanceState: Bundle?) {
        super.onCreate(savedInstanceState)
        binding = ActivityMainBinding.inflate(layoutInflater)
        title = getString(CoreR.string.core_title)
        binding.label.text = FormattedResources.greeting(user.name)
        // getString(R.string.commented_out)
        val debug = "R.string.in_literal"
        val a = context.obtainStyledAttributes(attrs, R.styleable.ChipView)
        val chip = a.getColor(R.styleable.ChipView_chipColor, 0)
        val ok = getString(android.R.string.ok)
    }
}
"#;

const MANIFEST: &str = r#"<manifest xmlns:android="http://schemas.android.com/apk/res/android">
    <application
        android:icon="@mipmap/ic_launcher"
        android:label="@string/app_name"
        android:theme="@style/AppTheme.Dark">
        <activity android:name=".MainActivity" />
    </application>
</manifest>
"#;

const ACTIVITY_MAIN: &str = r#"<LinearLayout xmlns:android="http://schemas.android.com/apk/res/android"
    xmlns:tools="http://schemas.android.com/tools"
    style="@style/Card">
    <ImageView android:src="@drawable/ic_logo" />
    <TextView
        android:id="@+id/label"
        tools:text="@string/tools_only" />
</LinearLayout>
"#;

const STYLES: &str = r#"<resources>
    <style name="AppTheme" parent="Theme.AppCompat.Light.NoActionBar">
        <item name="colorPrimary">@color/primary</item>
    </style>
    <style name="AppTheme.Dark" />
    <style name="BaseCard" />
    <style name="Card" parent="BaseCard">
        <item name="android:padding">@dimen/card_padding</item>
    </style>
    <style name="Orphan">
        <item name="chipUnused">@color/orphan_color</item>
    </style>
</resources>
"#;

const ATTRS: &str = r#"<resources>
    <declare-styleable name="ChipView">
        <attr name="chipColor" format="color" />
        <attr name="chipUnused" format="color" />
    </declare-styleable>
</resources>
"#;

fn sample_project() -> Project {
    let project = Project::new();
    project.file("app/src/main/AndroidManifest.xml", MANIFEST);
    project.src_file("com/example/app/MainActivity.kt", MAIN_ACTIVITY);

    project.res_file("layout/activity_main.xml", ACTIVITY_MAIN);
    project.res_file(
        "layout/unused_screen.xml",
        &format!("{}\n<FrameLayout />\n", XML_PROLOG),
    );
    project.res_file("drawable/ic_logo.xml", "<vector />\n");
    project.res_binary("drawable-hdpi/old_banner.png", &[0x89, 0x50, 0x4e, 0x47]);
    project.res_binary("mipmap-hdpi/ic_launcher.png", &[0x89, 0x50, 0x4e, 0x47]);

    project.values(
        "values/strings.xml",
        &[
            r#"<string name="app_name">Sample</string>"#,
            r#"<string name="core_title">Core</string>"#,
            r#"<string name="greeting">Hello %s</string>"#,
            r#"<string name="commented_out">Old</string>"#,
            r#"<string name="in_literal">Literal</string>"#,
            r#"<string name="tools_only">Preview</string>"#,
        ],
    );
    project.values(
        "values/colors.xml",
        &[
            "<color name=\"primary\">#6200EE</color>",
            "<color name=\"orphan_color\">#000000</color>",
            "<color name=\"unused_color\">#FFFFFF</color>",
        ],
    );
    project.values(
        "values/dimens.xml",
        &[
            r#"<dimen name="card_padding">8dp</dimen>"#,
            r#"<dimen name="unused_dimen">4dp</dimen>"#,
        ],
    );
    project.res_file("values/styles.xml", STYLES);
    project.res_file("values/attrs.xml", ATTRS);
    project
}

fn analyze(project: &Project) -> Analysis {
    ResourceAnalyzer::new(vec![project.res()], vec![project.root().join("app/src/main")]).analyze()
}

fn removable(analysis: &Analysis) -> BTreeSet<String> {
    analysis
        .classification
        .to_remove
        .iter()
        .map(|r| r.display_name())
        .collect()
}

#[test]
fn test_collects_every_declaration() {
    let project = sample_project();
    let declared = DeclarationCollector::new().collect(&[project.res()]);

    let names: BTreeSet<String> = declared.iter().map(|r| r.display_name()).collect();
    for expected in [
        "layout/activity_main",
        "layout/unused_screen",
        "drawable/ic_logo",
        "drawable/old_banner (hdpi)",
        "mipmap/ic_launcher (hdpi)",
        "string/app_name",
        "color/unused_color",
        "dimen/card_padding",
        "style/AppTheme.Dark",
        "style/Orphan",
        "attr/chipColor",
        "attr/chipUnused",
    ] {
        assert!(names.contains(expected), "missing {}", expected);
    }
    assert!(!names.iter().any(|n| n.contains("ChipView")));
}

#[test]
fn test_multi_line_style_location() {
    let project = sample_project();
    let declared = DeclarationCollector::new().collect(&[project.res()]);

    let app_theme = declared
        .iter()
        .find(|r| r.name == "AppTheme")
        .expect("AppTheme declared");
    match &app_theme.location {
        Location::Element {
            start_line,
            end_line,
            raw_text,
            ..
        } => {
            assert_eq!((*start_line, *end_line), (2, 4));
            assert!(raw_text.contains("colorPrimary"));
        }
        other => panic!("unexpected location {:?}", other),
    }
}

#[test]
fn test_unused_resources_found() {
    let project = sample_project();
    let analysis = analyze(&project);

    let expected: BTreeSet<String> = [
        "layout/unused_screen",
        "drawable/old_banner (hdpi)",
        "string/commented_out",
        "string/in_literal",
        "string/tools_only",
        "color/unused_color",
        "dimen/unused_dimen",
        "style/Orphan",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    assert_eq!(removable(&analysis), expected);
}

#[test]
fn test_each_convention_keeps_its_resource() {
    let project = sample_project();
    let analysis = analyze(&project);

    let kept: BTreeSet<String> = analysis
        .classification
        .to_keep
        .iter()
        .map(|k| k.resource.display_name())
        .collect();

    for expected in [
        "layout/activity_main",      // binding class
        "string/core_title",         // aliased symbol class
        "string/greeting",           // formatted accessor
        "string/app_name",           // manifest markup
        "mipmap/ic_launcher (hdpi)", // manifest markup
        "style/AppTheme.Dark",       // manifest markup
        "style/AppTheme",            // implicit parent of AppTheme.Dark
        "style/BaseCard",            // parent attribute
        "style/Card",                // layout style attribute
        "drawable/ic_logo",          // layout markup
        "attr/chipColor",            // attribute table
        "attr/chipUnused",           // style item of Orphan
        "color/orphan_color",        // value inside Orphan
        "color/primary",
        "dimen/card_padding",
    ] {
        assert!(kept.contains(expected), "{} should be kept", expected);
    }
}

#[test]
fn test_analysis_does_not_touch_disk() {
    let project = sample_project();
    let strings = project.res().join("values/strings.xml");
    let before = project.read(&strings);

    analyze(&project);

    assert_eq!(project.read(&strings), before);
    assert!(project.res().join("layout/unused_screen.xml").exists());
}

#[test]
fn test_config_rules_apply() {
    let project = sample_project();
    let config = Config {
        resource_dirs: vec![project.res()],
        source_dirs: vec![project.root().join("app/src/main")],
        exclude_names: vec!["unused_.*".to_string()],
        exclude_types: ["style".to_string()].into_iter().collect(),
        ..Config::default()
    };

    let analysis = ResourceAnalyzer::from_config(&config).unwrap().analyze();
    let removed = removable(&analysis);

    assert!(!removed.contains("layout/unused_screen"));
    assert!(!removed.contains("color/unused_color"));
    assert!(!removed.contains("style/Orphan"));
    assert!(removed.contains("string/in_literal"));

    let orphan = analysis
        .classification
        .to_keep
        .iter()
        .find(|k| k.resource.name == "Orphan")
        .unwrap();
    assert_eq!(orphan.reason, KeepReason::ExcludedType);
}

#[test]
fn test_target_types_limit_candidates() {
    let project = sample_project();
    let config = Config {
        resource_dirs: vec![project.res()],
        source_dirs: vec![project.root().join("app/src/main")],
        target_types: ["string".to_string()].into_iter().collect(),
        ..Config::default()
    };

    let analysis = ResourceAnalyzer::from_config(&config).unwrap().analyze();
    assert!(analysis
        .classification
        .to_remove
        .iter()
        .all(|r| r.resource_type == ResourceType::String));
    assert_eq!(analysis.classification.to_remove.len(), 3);
}

#[test]
fn test_unknown_type_in_config_is_rejected() {
    let config = Config {
        target_types: ["font".to_string()].into_iter().collect(),
        ..Config::default()
    };
    assert!(ResourceAnalyzer::from_config(&config).is_err());
}

#[test]
fn test_name_shared_across_types_keeps_both() {
    // A reference by name keeps a resource of another type with that name
    let project = Project::new();
    project.src_file("Main.kt", "val icon = R.drawable.banner");
    project.res_file("drawable/banner.xml", "<shape />\n");
    project.values("values/strings.xml", &[r#"<string name="banner">Banner</string>"#]);

    let analysis = ResourceAnalyzer::new(vec![project.res()], vec![project.src()]).analyze();

    assert!(analysis.classification.to_remove.is_empty());
    let string = analysis
        .classification
        .to_keep
        .iter()
        .find(|k| k.resource.resource_type == ResourceType::String)
        .unwrap();
    assert_eq!(string.reason, KeepReason::ReferencedByName);
}

#[test]
fn test_qualified_variants_share_fate() {
    let project = Project::new();
    project.src_file("Main.kt", "getString(R.string.title)");
    project.values("values/strings.xml", &[r#"<string name="title">Title</string>"#, r#"<string name="gone">Gone</string>"#]);
    project.values("values-fr/strings.xml", &[r#"<string name="title">Titre</string>"#, r#"<string name="gone">Parti</string>"#]);

    let analysis = ResourceAnalyzer::new(vec![project.res()], vec![project.src()]).analyze();

    let removed: Vec<String> = analysis
        .classification
        .to_remove
        .iter()
        .map(|r| r.display_name())
        .collect();
    assert_eq!(removed, vec!["string/gone", "string/gone (fr)"]);
}

#[test]
fn test_parent_of_multi_line_style_tag_kept() {
    let project = Project::new();
    project.src_file("Main.kt", "setTheme(R.style.AppTheme_Dark)");
    project.res_file(
        "values/themes.xml",
        r#"<resources>
    <style name="AppTheme" parent="Theme.Material3.DayNight" />
    <style
        name="AppTheme.Dark">
        <item name="android:windowBackground">@android:color/black</item>
    </style>
</resources>
"#,
    );

    let analysis = ResourceAnalyzer::new(vec![project.res()], vec![project.src()]).analyze();

    assert!(analysis.classification.to_remove.is_empty());
    let parent = analysis
        .classification
        .to_keep
        .iter()
        .find(|k| k.resource.name == "AppTheme")
        .unwrap();
    assert_eq!(parent.reason, KeepReason::Referenced);
}
