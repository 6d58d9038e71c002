use std::io::Read;

use eyre::{Context, Result, bail};
use pgamotor::cgmath::Matrix4;
use pgamotor::gpu::CameraUniform;
use pgamotor::prelude::*;
use pgamotor::pipeline;
use serde::Serialize;

use crate::scene::{Format, Scene, Twist};

/// Evaluate and validate motor-based scenes
#[derive(Debug, clap::Parser)]
#[command(version)]
pub(crate) struct Args {
    #[command(subcommand)]
    pub subcommand: Subcommand,
}

#[derive(clap::Subcommand, Debug)]
pub(crate) enum Subcommand {
    /// Print the world pose and affine matrix of every object as JSON.
    Pose {
        /// Scene file (YAML, or JSON if the extension is `.json`), use '-'
        /// for stdin.
        #[arg(value_parser)]
        scene: clio::Input,

        /// Time(s) at which to sample keyframes.
        #[arg(short, long = "time", default_value = "0", allow_negative_numbers = true)]
        times: Vec<Float>,
    },
    /// Project every object's vertices into clip space using both the motor
    /// path and the matrix path, and check that they agree.
    Project {
        /// Scene file (YAML, or JSON if the extension is `.json`), use '-'
        /// for stdin.
        #[arg(value_parser)]
        scene: clio::Input,

        /// Time at which to sample keyframes.
        #[arg(short, long, default_value = "0", allow_negative_numbers = true)]
        time: Float,

        /// Largest allowed difference between the two paths.
        #[arg(long, default_value = "0.0001")]
        tolerance: Float,
    },
    /// Integrate the velocity and acceleration of every object and print the
    /// world poses after each step as JSON.
    Simulate {
        /// Scene file (YAML, or JSON if the extension is `.json`), use '-'
        /// for stdin.
        #[arg(value_parser)]
        scene: clio::Input,

        /// Number of steps.
        #[arg(short = 'n', long, default_value = "10")]
        steps: usize,

        /// Length of each step.
        #[arg(long, default_value = "0.0166666667")]
        dt: Float,
    },
}

#[derive(Serialize, Debug)]
struct Frame<'a> {
    time: Float,
    objects: Vec<PoseReport<'a>>,
}

#[derive(Serialize, Debug)]
struct PoseReport<'a> {
    name: &'a str,
    motor: Motor,
    matrix: AffineMatrix,
}

#[derive(Serialize, Debug)]
struct ProjectionReport<'a> {
    time: Float,
    max_discrepancy: Float,
    objects: Vec<ObjectProjection<'a>>,
}

#[derive(Serialize, Debug)]
struct ObjectProjection<'a> {
    name: &'a str,
    vertices: Vec<VertexProjection>,
}

#[derive(Serialize, Debug)]
struct VertexProjection {
    model: [Float; 3],
    by_motor: [Float; 4],
    by_matrix: [GpuFloat; 4],
    discrepancy: Float,
}

pub(crate) fn exec(subcommand: Subcommand) -> Result<()> {
    match subcommand {
        Subcommand::Pose { scene, times } => {
            let scene = load_scene(scene)?;
            let frames = times
                .iter()
                .map(|&t| pose_frame(&scene, t))
                .collect::<Result<Vec<_>>>()?;
            write_json_output(&frames)
        }

        Subcommand::Project {
            scene,
            time,
            tolerance,
        } => {
            let scene = load_scene(scene)?;
            let report = project(&scene, time)?;
            write_json_output(&report)?;
            if report.max_discrepancy > tolerance {
                bail!(
                    "motor and matrix paths differ by {} (tolerance is {tolerance})",
                    report.max_discrepancy,
                );
            }
            Ok(())
        }

        Subcommand::Simulate { scene, steps, dt } => {
            let scene = load_scene(scene)?;
            let frames = simulate(&scene, steps, dt)?;
            write_json_output(&frames)
        }
    }
}

fn load_scene(mut input: clio::Input) -> Result<Scene> {
    let format = Format::from_path(input.path());
    let mut buffer = String::new();
    input
        .read_to_string(&mut buffer)
        .context("error reading scene file")?;
    Scene::parse(&buffer, format)
}

fn pose_frame(scene: &Scene, time: Float) -> Result<Frame<'_>> {
    let poses = scene.world_poses_at(time)?;
    Ok(Frame {
        time,
        objects: pose_reports(scene, poses),
    })
}

fn pose_reports(scene: &Scene, poses: Vec<Motor>) -> Vec<PoseReport<'_>> {
    std::iter::zip(&scene.objects, poses)
        .map(|(obj, motor)| PoseReport {
            name: &obj.name,
            motor,
            matrix: motor.to_affine_matrix(),
        })
        .collect()
}

fn project(scene: &Scene, time: Float) -> Result<ProjectionReport<'_>> {
    let poses = scene.world_poses_at(time)?;
    let camera = scene.camera.pose.to_motor();
    let projection = scene.camera.projection;

    // Round-trip through the uniform layout so that the matrix path sees
    // exactly what a shader would.
    let view_proj = Matrix4::from(CameraUniform::from(scene.view_projection()));

    let mut max_discrepancy: Float = 0.0;
    let objects = std::iter::zip(&scene.objects, poses)
        .map(|(obj, pose)| {
            let model_view = camera.reverse() * pose;
            let instance = pose.to_affine_matrix();
            let vertices = obj
                .vertices
                .iter()
                .map(|&model| {
                    let p = Point3::from(model);
                    let by_motor = model_view.transform_and_project(&projection, p);
                    let by_matrix = pipeline::clip_from_view_projection(&view_proj, &instance, p);
                    let by_motor: [Float; 4] = by_motor.into();
                    let by_matrix: [GpuFloat; 4] = by_matrix.into();
                    let discrepancy = std::iter::zip(by_motor, by_matrix)
                        .map(|(a, b)| (a - b as Float).abs())
                        .fold(0.0, Float::max);
                    max_discrepancy = max_discrepancy.max(discrepancy);
                    VertexProjection {
                        model,
                        by_motor,
                        by_matrix,
                        discrepancy,
                    }
                })
                .collect();
            ObjectProjection {
                name: &obj.name,
                vertices,
            }
        })
        .collect();

    log::info!("maximum discrepancy between motor and matrix paths: {max_discrepancy}");
    Ok(ProjectionReport {
        time,
        max_discrepancy,
        objects,
    })
}

fn simulate(scene: &Scene, steps: usize, dt: Float) -> Result<Vec<Frame<'_>>> {
    let parents = scene.hierarchy()?;
    let mut bodies: Vec<(RigidBody, Bivector)> = scene
        .objects
        .iter()
        .map(|obj| {
            let body = RigidBody {
                pose: obj.local_pose_at(0.0),
                velocity: obj.velocity.as_ref().map_or(Bivector::ZERO, Twist::to_bivector),
            };
            let acceleration = obj
                .acceleration
                .as_ref()
                .map_or(Bivector::ZERO, Twist::to_bivector);
            (body, acceleration)
        })
        .collect();

    let mut frames = vec![];
    for i in 1..=steps {
        for (body, acceleration) in &mut bodies {
            body.step(*acceleration, dt);
        }
        let local_poses: Vec<Motor> = bodies.iter().map(|(body, _)| body.pose).collect();
        let world = Scene::compose_hierarchy(&parents, &local_poses);
        frames.push(Frame {
            time: i as Float * dt,
            objects: pose_reports(scene, world),
        });
    }
    Ok(frames)
}

fn write_json_output<T: Serialize>(value: &T) -> Result<()> {
    serde_json::to_writer_pretty(std::io::stdout(), value)
        .context("error serializing data and writing to stdout")?;
    println!();
    Ok(())
}
